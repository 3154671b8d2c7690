use std::path::Path;

use anyhow::Context as _;
use chrono::Utc;
use log::info;

use crate::auth::Session;
use crate::editor::{self, Assists};
use crate::model::{PostFields, split_keywords};
use crate::render;
use crate::store::{POST_BUCKET, Store, object_name};
use crate::syndication;
use crate::validate;

use super::{PostForm, upload_file};
use crate::commands::{Context, confirm, read_text};

pub(super) fn cmd_ls(ctx: &Context, store: &Store) -> anyhow::Result<()> {
    let posts = store.all_posts().context("could not load posts")?;
    if posts.is_empty() {
        println!("No posts yet.");
        return Ok(());
    }
    print!("{}", render::by_status(&posts, &ctx.palette, ctx.width()));
    Ok(())
}

pub(super) fn cmd_new(
    ctx: &Context,
    store: &Store,
    session: &Session,
    form: PostForm,
) -> anyhow::Result<()> {
    let mut draft = PostFields::default();
    fill(ctx, store, session, &mut draft, form)?;
    let post = store.create_post(&draft).context("failed to create post")?;
    println!("Created post #{} ({}).", post.id, post.status);
    if post.is_published() {
        println!("{}", syndication::post_link(&ctx.settings.site_url, post.id));
    }
    Ok(())
}

pub(super) fn cmd_edit(
    ctx: &Context,
    store: &Store,
    session: &Session,
    id: i64,
    form: PostForm,
) -> anyhow::Result<()> {
    let existing = store
        .post(id)
        .with_context(|| format!("could not load post #{id}"))?;
    let mut draft = PostFields::from(&existing);
    fill(ctx, store, session, &mut draft, form)?;
    store
        .update_post(id, &draft)
        .with_context(|| format!("failed to update post #{id}"))?;
    println!("Updated post #{id} ({}).", draft.status);
    Ok(())
}

pub(super) fn cmd_rm(store: &Store, id: i64, yes: bool) -> anyhow::Result<()> {
    if !confirm(&format!("delete post #{id}"), yes)? {
        println!("Kept post #{id}.");
        return Ok(());
    }
    store
        .delete_post(id)
        .with_context(|| format!("failed to delete post #{id}"))?;
    println!("Deleted post #{id}.");
    Ok(())
}

/// Apply the form onto `draft`, run the requested assists, then check the
/// result before anything is written.
fn fill(
    ctx: &Context,
    store: &Store,
    session: &Session,
    draft: &mut PostFields,
    form: PostForm,
) -> anyhow::Result<()> {
    let assists = Assists {
        article_topic: form.ai_article.clone(),
        seo: form.ai_seo,
        summary: form.ai_summary,
        image: form.ai_image,
    };
    apply_form(draft, &form)?;
    if let Some(path) = &form.image {
        draft.image_url = upload_file(store, POST_BUCKET, None, path)?;
    }

    if !assists.is_empty() {
        let generator = ctx.generator()?;
        let pb = crate::http::spinner("Generating");
        let failures = editor::apply(draft, &assists, &generator, |bytes| {
            let name = object_name(None, "ai_generated.jpg", Utc::now());
            Ok(store.upload(POST_BUCKET, &name, bytes, "image/jpeg")?)
        });
        pb.finish_and_clear();
        let p = &ctx.palette;
        for (step, e) in &failures {
            eprintln!("{}{step} failed: {e}{}", p.error, p.reset);
        }
        if failures.is_empty() {
            info!("assists applied");
        }
    }

    draft.author = session.email().to_string();
    draft.meta_title = draft.title.clone();
    validate::post(draft)?;
    Ok(())
}

fn apply_form(draft: &mut PostFields, form: &PostForm) -> anyhow::Result<()> {
    let set = |field: &mut String, value: &Option<String>| {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    };
    set(&mut draft.title, &form.title);
    set(&mut draft.category, &form.category);
    set(&mut draft.summary, &form.summary);
    set(&mut draft.meta_description, &form.meta_description);
    set(&mut draft.image_url, &form.image_url);
    if let Some(content) = &form.content {
        draft.content = content.clone();
    }
    if let Some(path) = &form.content_file {
        let file = (path != Path::new("-")).then_some(path.as_path());
        draft.content = read_text(file)?;
    }
    if let Some(keywords) = &form.keywords {
        draft.keywords = split_keywords(keywords);
    }
    if let Some(status) = form.status {
        draft.status = status;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostStatus;

    #[test]
    fn test_form_only_replaces_given_fields() {
        let mut draft = PostFields {
            title: "Old".to_string(),
            content: "Body".to_string(),
            category: "Tech".to_string(),
            keywords: vec!["a".to_string()],
            ..PostFields::default()
        };
        let form = PostForm {
            title: Some("  New  ".to_string()),
            keywords: Some("rust, cli ,".to_string()),
            status: Some(PostStatus::Published),
            ..PostForm::default()
        };
        apply_form(&mut draft, &form).unwrap();
        assert_eq!(draft.title, "New");
        assert_eq!(draft.content, "Body");
        assert_eq!(draft.category, "Tech");
        assert_eq!(draft.keywords, vec!["rust", "cli"]);
        assert_eq!(draft.status, PostStatus::Published);
    }

    #[test]
    fn test_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.html");
        std::fs::write(&path, "<p>From file</p>").unwrap();
        let mut draft = PostFields::default();
        let form = PostForm {
            content_file: Some(path),
            ..PostForm::default()
        };
        apply_form(&mut draft, &form).unwrap();
        assert_eq!(draft.content, "<p>From file</p>");
    }
}
