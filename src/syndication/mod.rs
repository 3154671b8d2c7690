mod atom;
mod rss;

use crate::model::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Rss,
    Atom,
}

/// The public site the exported feed points back to.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub title: &'a str,
    pub url: &'a str,
}

impl Site<'_> {
    pub fn post_link(&self, id: i64) -> String {
        post_link(self.url, id)
    }
}

/// Public address of a post on the blog's web front end.
pub fn post_link(site_url: &str, id: i64) -> String {
    format!("{}/#/post/{id}", site_url.trim_end_matches('/'))
}

pub fn render(format: Format, site: &Site<'_>, posts: &[Post]) -> String {
    match format {
        Format::Rss => rss::render(site, posts),
        Format::Atom => atom::render(site, posts),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::model::{Post, PostStatus};

    pub fn post(id: i64, title: &str) -> Post {
        Post {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 1, id as u32, 12, 0, 0).unwrap(),
            title: title.to_string(),
            content: format!("<p>{title} body</p>"),
            category: "Tech".to_string(),
            author: "admin@example.com".to_string(),
            status: PostStatus::Published,
            image_url: None,
            summary: Some("- short".to_string()),
            meta_title: None,
            meta_description: None,
            keywords: vec!["rust".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_link_uses_hash_route() {
        assert_eq!(
            post_link("https://blog.example.com/", 12),
            "https://blog.example.com/#/post/12"
        );
    }
}
