use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Free-text copy of a category name, not a reference.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    pub status: PostStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default, deserialize_with = "keyword_list")]
    pub keywords: Vec<String>,
}

impl Post {
    pub fn image(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref())
    }

    pub fn summary(&self) -> Option<&str> {
        non_empty(self.summary.as_deref())
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Writable columns of a post, as sent on insert and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: PostStatus,
    pub image_url: String,
    pub author: String,
    pub summary: String,
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
}

impl From<&Post> for PostFields {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            status: post.status,
            image_url: post.image_url.clone().unwrap_or_default(),
            author: post.author.clone(),
            summary: post.summary.clone().unwrap_or_default(),
            meta_title: post.meta_title.clone().unwrap_or_default(),
            meta_description: post.meta_description.clone().unwrap_or_default(),
            keywords: post.keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TitleRef {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "users")]
    pub author: Option<NameRef>,
    #[serde(default, rename = "posts")]
    pub post: Option<TitleRef>,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Anonymous")
    }

    pub fn post_title(&self) -> &str {
        self.post
            .as_ref()
            .map(|p| p.title.as_str())
            .unwrap_or("Unknown Post")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Advertisement {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default, rename = "ad_description", deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(rename = "ad_link")]
    pub link: String,
    #[serde(rename = "status")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdFields {
    pub title: String,
    #[serde(rename = "ad_description")]
    pub description: String,
    pub image_url: String,
    #[serde(rename = "ad_link")]
    pub link: String,
    #[serde(rename = "status")]
    pub active: bool,
}

impl From<&Advertisement> for AdFields {
    fn from(ad: &Advertisement) -> Self {
        Self {
            title: ad.title.clone(),
            description: ad.description.clone(),
            image_url: ad.image_url.clone(),
            link: ad.link.clone(),
            active: ad.active,
        }
    }
}

/// Public profile row, so comment authors can be shown by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

// Older rows store keywords as one comma-separated string.
fn keyword_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(d)? {
        None => Vec::new(),
        Some(Raw::List(list)) => list
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        Some(Raw::Text(text)) => split_keywords(&text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_json(keywords: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 7,
            "created_at": "2024-03-01T10:30:00.123456+00:00",
            "title": "Hello",
            "content": "<p>Body</p>",
            "category": "Tech",
            "author": "admin@example.com",
            "status": "published",
            "image_url": "",
            "summary": null,
            "keywords": keywords,
        })
    }

    #[test]
    fn test_post_keywords_from_array() {
        let post: Post = serde_json::from_value(post_json(json!(["rust", " cli ", ""]))).unwrap();
        assert_eq!(post.keywords, vec!["rust", "cli"]);
    }

    #[test]
    fn test_post_keywords_from_comma_string() {
        let post: Post = serde_json::from_value(post_json(json!("rust, cli,,web "))).unwrap();
        assert_eq!(post.keywords, vec!["rust", "cli", "web"]);
    }

    #[test]
    fn test_post_keywords_null() {
        let post: Post = serde_json::from_value(post_json(json!(null))).unwrap();
        assert!(post.keywords.is_empty());
    }

    #[test]
    fn test_post_timestamp_and_optional_fields() {
        let post: Post = serde_json::from_value(post_json(json!([]))).unwrap();
        assert_eq!(post.created_at.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 10:30");
        assert!(post.is_published());
        assert_eq!(post.image(), None);
        assert_eq!(post.summary(), None);
    }

    #[test]
    fn test_post_null_category_becomes_empty() {
        let mut value = post_json(json!([]));
        value["category"] = json!(null);
        let post: Post = serde_json::from_value(value).unwrap();
        assert_eq!(post.category, "");
    }

    #[test]
    fn test_post_fields_carry_edit_state() {
        let post: Post = serde_json::from_value(post_json(json!(["a"]))).unwrap();
        let fields = PostFields::from(&post);
        assert_eq!(fields.title, "Hello");
        assert_eq!(fields.status, PostStatus::Published);
        assert_eq!(fields.summary, "");
        assert_eq!(fields.keywords, vec!["a"]);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(PostStatus::Draft).unwrap(), json!("draft"));
        assert_eq!(PostStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_comment_with_joined_names() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 1,
            "post_id": 7,
            "user_id": "u-1",
            "content": "Nice",
            "created_at": "2024-03-02T00:00:00Z",
            "users": {"name": "Ada"},
            "posts": {"title": "Hello"},
        }))
        .unwrap();
        assert_eq!(comment.author_name(), "Ada");
        assert_eq!(comment.post_title(), "Hello");
    }

    #[test]
    fn test_comment_without_profile() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 1,
            "post_id": 7,
            "user_id": "u-1",
            "content": "Nice",
            "created_at": "2024-03-02T00:00:00Z",
            "users": null,
        }))
        .unwrap();
        assert_eq!(comment.author_name(), "Anonymous");
        assert_eq!(comment.post_title(), "Unknown Post");
    }

    #[test]
    fn test_advertisement_column_names() {
        let ad: Advertisement = serde_json::from_value(json!({
            "id": 3,
            "created_at": "2024-03-02T00:00:00Z",
            "title": "Sale",
            "ad_description": null,
            "image_url": "https://cdn/x.png",
            "ad_link": "https://shop",
            "status": true,
        }))
        .unwrap();
        assert!(ad.active);
        assert_eq!(ad.link, "https://shop");
        assert_eq!(ad.description, "");

        let fields = serde_json::to_value(AdFields::from(&ad)).unwrap();
        assert_eq!(fields["ad_link"], "https://shop");
        assert_eq!(fields["status"], true);
        assert_eq!(fields["ad_description"], "");
    }
}
