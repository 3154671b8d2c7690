use feedmix::RowRange;
use serde_json::json;

use crate::model::{
    AdFields, Advertisement, Category, Comment, NewComment, Post, PostFields, PostStatus, Profile,
};

use super::{ADS, CATEGORIES, COMMENTS, POSTS, Query, Store, StoreError, USERS};

/// One window of a listing and the number of rows matching it overall.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: usize,
}

fn published() -> Query {
    Query::table(POSTS)
        .select("*")
        .eq("status", PostStatus::Published)
}

impl Store {
    pub fn published_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch(&published().order("created_at", true))
    }

    pub fn latest_published(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        self.fetch(&published().order("created_at", true).limit(limit))
    }

    pub fn published_page(&self, search: &str, range: RowRange) -> Result<PostPage, StoreError> {
        let mut query = published();
        if !search.trim().is_empty() {
            query = query.ilike("title", search);
        }
        let query = query.order("created_at", true).range(range);
        let (posts, total) = self.fetch_counted(&query)?;
        Ok(PostPage { posts, total })
    }

    pub fn published_post(&self, id: i64) -> Result<Post, StoreError> {
        self.fetch_one(published(), id)
    }

    pub fn published_in_category(&self, category: &str) -> Result<Vec<Post>, StoreError> {
        self.fetch(&published().eq("category", category).order("created_at", true))
    }

    /// Other published posts sharing the post's category label.
    pub fn related_posts(&self, post: &Post, limit: usize) -> Result<Vec<Post>, StoreError> {
        if post.category.is_empty() {
            return Ok(Vec::new());
        }
        let query = published()
            .eq("category", &post.category)
            .neq("id", post.id)
            .order("created_at", true)
            .limit(limit);
        self.fetch(&query)
    }

    pub fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch(&Query::table(POSTS).select("*").order("created_at", true))
    }

    pub fn post(&self, id: i64) -> Result<Post, StoreError> {
        self.fetch_one(Query::table(POSTS).select("*"), id)
    }

    pub fn create_post(&self, fields: &PostFields) -> Result<Post, StoreError> {
        self.insert(POSTS, fields)
    }

    pub fn update_post(&self, id: i64, fields: &PostFields) -> Result<(), StoreError> {
        self.update(&Query::table(POSTS).eq("id", id), fields)
    }

    pub fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        self.delete(&Query::table(POSTS).eq("id", id))
    }

    pub fn count_posts_labelled(&self, category: &str) -> Result<usize, StoreError> {
        let query = Query::table(POSTS)
            .select("id")
            .eq("category", category)
            .limit(0);
        let (_, total) = self.fetch_counted::<serde_json::Value>(&query)?;
        Ok(total)
    }

    pub fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.fetch(&Query::table(CATEGORIES).select("*").order("name", false))
    }

    pub fn category(&self, id: i64) -> Result<Category, StoreError> {
        self.fetch_one(Query::table(CATEGORIES).select("*"), id)
    }

    pub fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        self.insert(CATEGORIES, &json!({ "name": name }))
    }

    pub fn rename_category(&self, id: i64, name: &str) -> Result<(), StoreError> {
        self.update(&Query::table(CATEGORIES).eq("id", id), &json!({ "name": name }))
    }

    pub fn delete_category(&self, id: i64) -> Result<(), StoreError> {
        self.delete(&Query::table(CATEGORIES).eq("id", id))
    }

    /// Comments on a post, newest first, with author names.
    pub fn comments_for(&self, post_id: i64) -> Result<Vec<Comment>, StoreError> {
        let query = Query::table(COMMENTS)
            .select("*,users(name)")
            .eq("post_id", post_id)
            .order("created_at", true);
        self.fetch(&query)
    }

    pub fn all_comments(&self) -> Result<Vec<Comment>, StoreError> {
        let query = Query::table(COMMENTS)
            .select("*,users(name),posts(title)")
            .order("created_at", true);
        self.fetch(&query)
    }

    pub fn add_comment(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        self.insert(COMMENTS, comment)
    }

    pub fn delete_comment(&self, id: i64) -> Result<(), StoreError> {
        self.delete(&Query::table(COMMENTS).eq("id", id))
    }

    pub fn active_ads(&self) -> Result<Vec<Advertisement>, StoreError> {
        let query = Query::table(ADS)
            .select("*")
            .eq("status", true)
            .order("id", false);
        self.fetch(&query)
    }

    pub fn all_ads(&self) -> Result<Vec<Advertisement>, StoreError> {
        self.fetch(&Query::table(ADS).select("*").order("created_at", true))
    }

    pub fn ad(&self, id: i64) -> Result<Advertisement, StoreError> {
        self.fetch_one(Query::table(ADS).select("*"), id)
    }

    pub fn create_ad(&self, fields: &AdFields) -> Result<Advertisement, StoreError> {
        self.insert(ADS, fields)
    }

    pub fn update_ad(&self, id: i64, fields: &AdFields) -> Result<(), StoreError> {
        self.update(&Query::table(ADS).eq("id", id), fields)
    }

    pub fn set_ads_active(&self, ids: &[i64], active: bool) -> Result<(), StoreError> {
        self.update(&Query::table(ADS).is_in("id", ids), &json!({ "status": active }))
    }

    pub fn delete_ads(&self, ids: &[i64]) -> Result<(), StoreError> {
        self.delete(&Query::table(ADS).is_in("id", ids))
    }

    pub fn create_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let _: serde_json::Value = self.insert(USERS, profile)?;
        Ok(())
    }
}
