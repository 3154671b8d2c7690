use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder};

use super::Site;
use crate::model::Post;

pub fn render(site: &Site<'_>, posts: &[Post]) -> String {
    let items = posts
        .iter()
        .map(|post| {
            let link = site.post_link(post.id);
            ItemBuilder::default()
                .title(Some(post.title.clone()))
                .link(Some(link.clone()))
                .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
                .pub_date(Some(post.created_at.to_rfc2822()))
                .author(Some(post.author.clone()).filter(|a| !a.is_empty()))
                .description(post.summary().map(str::to_string))
                .content(Some(post.content.clone()))
                .categories(
                    Some(&post.category)
                        .filter(|c| !c.is_empty())
                        .map(|c| CategoryBuilder::default().name(c.clone()).build())
                        .into_iter()
                        .collect::<Vec<_>>(),
                )
                .build()
        })
        .collect::<Vec<_>>();

    ChannelBuilder::default()
        .title(site.title.to_string())
        .link(site.url.to_string())
        .description(format!("Latest posts from {}", site.title))
        .items(items)
        .build()
        .to_string()
}
