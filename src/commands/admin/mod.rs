//! Signed-in management of posts, categories, comments and advertisements.

mod ads;
mod categories;
mod comments;
mod dashboard;
mod posts;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::model::PostStatus;
use crate::store::{Store, object_name};

use super::Context;

#[derive(Subcommand)]
pub(crate) enum AdminCommand {
    /// Show how many posts, categories and comments exist
    Dashboard,
    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommand,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Moderate comments
    Comment {
        #[command(subcommand)]
        command: CommentCommand,
    },
    /// Manage advertisements
    Ad {
        #[command(subcommand)]
        command: AdCommand,
    },
}

#[derive(Subcommand)]
pub(crate) enum PostCommand {
    /// List every post, drafts included
    Ls,
    /// Create a post
    New {
        #[command(flatten)]
        form: PostForm,
    },
    /// Change an existing post; only the given fields are replaced
    Edit {
        id: i64,
        #[command(flatten)]
        form: PostForm,
    },
    /// Delete a post
    Rm {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Post fields and AI assists accepted by `post new` and `post edit`.
#[derive(Args, Debug, Default)]
pub(crate) struct PostForm {
    #[arg(long)]
    pub title: Option<String>,
    /// Body text (HTML or Markdown)
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read the body from a file, or from stdin with "-"
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<PostStatus>,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long)]
    pub meta_description: Option<String>,
    /// Comma-separated keywords
    #[arg(long)]
    pub keywords: Option<String>,
    /// Address of an already hosted cover image
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,
    /// Upload a local cover image
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
    /// Generate title, body, description and keywords about TOPIC
    #[arg(long, value_name = "TOPIC")]
    pub ai_article: Option<String>,
    /// Replace title, description and keywords with generated SEO suggestions
    #[arg(long)]
    pub ai_seo: bool,
    /// Generate the bullet-point summary from the body
    #[arg(long)]
    pub ai_summary: bool,
    /// Generate and upload a cover image from the title
    #[arg(long, conflicts_with_all = ["image", "image_url"])]
    pub ai_image: bool,
}

#[derive(Subcommand)]
pub(crate) enum CategoryCommand {
    /// List categories
    Ls,
    /// Create a category
    Add { name: String },
    /// Rename a category; posts keep the label they were saved with
    Rename { id: i64, name: String },
    /// Delete a category
    Rm {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum CommentCommand {
    /// List all comments with their author and post
    Ls,
    /// Delete a comment
    Rm {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum AdCommand {
    /// List advertisements, inactive ones included
    Ls,
    /// Create an advertisement
    Add {
        #[command(flatten)]
        form: AdForm,
    },
    /// Change an advertisement; only the given fields are replaced
    Edit {
        id: i64,
        #[command(flatten)]
        form: AdForm,
    },
    /// Show advertisements on the site
    Activate {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Hide advertisements from the site
    Deactivate {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Delete advertisements
    Rm {
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct AdForm {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Target address the ad links to
    #[arg(long)]
    pub link: Option<String>,
    /// Address of an already hosted image
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,
    /// Upload a local image
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
    /// Show on the site right away
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    /// Keep hidden from the site
    #[arg(long)]
    pub inactive: bool,
}

pub(crate) fn run(ctx: &Context, command: AdminCommand) -> anyhow::Result<()> {
    let (store, session) = ctx.user_store()?;
    match command {
        AdminCommand::Dashboard => dashboard::cmd_dashboard(ctx, &store),
        AdminCommand::Post { command } => match command {
            PostCommand::Ls => posts::cmd_ls(ctx, &store),
            PostCommand::New { form } => posts::cmd_new(ctx, &store, &session, form),
            PostCommand::Edit { id, form } => posts::cmd_edit(ctx, &store, &session, id, form),
            PostCommand::Rm { id, yes } => posts::cmd_rm(&store, id, yes),
        },
        AdminCommand::Category { command } => match command {
            CategoryCommand::Ls => categories::cmd_ls(&store),
            CategoryCommand::Add { name } => categories::cmd_add(&store, &name),
            CategoryCommand::Rename { id, name } => categories::cmd_rename(&store, id, &name),
            CategoryCommand::Rm { id, yes } => categories::cmd_rm(&store, id, yes),
        },
        AdminCommand::Comment { command } => match command {
            CommentCommand::Ls => comments::cmd_ls(ctx, &store),
            CommentCommand::Rm { id, yes } => comments::cmd_rm(&store, id, yes),
        },
        AdminCommand::Ad { command } => match command {
            AdCommand::Ls => ads::cmd_ls(ctx, &store),
            AdCommand::Add { form } => ads::cmd_add(&store, form),
            AdCommand::Edit { id, form } => ads::cmd_edit(&store, id, form),
            AdCommand::Activate { ids } => ads::cmd_set_active(&store, &ids, true),
            AdCommand::Deactivate { ids } => ads::cmd_set_active(&store, &ids, false),
            AdCommand::Rm { ids, yes } => ads::cmd_rm(&store, &ids, yes),
        },
    }
}

/// Upload a local image file into `bucket` and return its public address.
fn upload_file(store: &Store, bucket: &str, prefix: Option<&str>, path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let name = object_name(prefix, &file_name, Utc::now());
    let pb = crate::http::spinner(format!("Uploading {file_name}"));
    let url = store.upload(bucket, &name, bytes, content_type.essence_str());
    pb.finish_and_clear();
    Ok(url?)
}
