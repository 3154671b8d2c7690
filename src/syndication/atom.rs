use atom_syndication::{
    CategoryBuilder, ContentBuilder, EntryBuilder, FeedBuilder, LinkBuilder, PersonBuilder, Text,
};
use chrono::Utc;

use super::Site;
use crate::model::Post;

pub fn render(site: &Site<'_>, posts: &[Post]) -> String {
    let entries = posts
        .iter()
        .map(|post| {
            let link = site.post_link(post.id);
            let mut entry = EntryBuilder::default();
            entry
                .title(Text::plain(post.title.clone()))
                .id(link.clone())
                .updated(post.created_at.fixed_offset())
                .published(Some(post.created_at.fixed_offset()))
                .links(vec![LinkBuilder::default().href(link).rel("alternate").build()])
                .content(Some(
                    ContentBuilder::default()
                        .value(Some(post.content.clone()))
                        .content_type(Some("html".to_string()))
                        .build(),
                ));
            if let Some(summary) = post.summary() {
                entry.summary(Some(Text::plain(summary)));
            }
            if !post.author.is_empty() {
                entry.authors(vec![PersonBuilder::default().name(post.author.clone()).build()]);
            }
            if !post.category.is_empty() {
                entry.categories(vec![
                    CategoryBuilder::default().term(post.category.clone()).build(),
                ]);
            }
            entry.build()
        })
        .collect::<Vec<_>>();

    let updated = posts
        .iter()
        .map(|p| p.created_at)
        .max()
        .unwrap_or_else(Utc::now);

    FeedBuilder::default()
        .title(Text::plain(site.title))
        .id(site.url.to_string())
        .updated(updated.fixed_offset())
        .links(vec![LinkBuilder::default().href(site.url).rel("alternate").build()])
        .entries(entries)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syndication::fixtures::post;
    use atom_syndication::Feed;

    #[test]
    fn test_feed_entries_and_updated() {
        let site = Site {
            title: "My Blog",
            url: "https://blog.example.com",
        };
        let xml = render(&site, &[post(3, "Newest"), post(1, "Oldest")]);
        let feed: Feed = xml.parse().unwrap();

        assert_eq!(feed.title().as_str(), "My Blog");
        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.entries()[0].title().as_str(), "Newest");
        assert_eq!(feed.entries()[0].id(), "https://blog.example.com/#/post/3");
        assert_eq!(
            feed.updated().format("%Y-%m-%d").to_string(),
            "2024-01-03"
        );
        assert_eq!(feed.entries()[1].categories()[0].term(), "Tech");
    }
}
