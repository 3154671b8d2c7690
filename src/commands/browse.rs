use anyhow::Context as _;
use log::info;

use crate::model::NewComment;
use crate::render;
use crate::syndication;
use crate::validate;

use super::Context;

pub(crate) fn cmd_categories(ctx: &Context) -> anyhow::Result<()> {
    let categories = ctx.store()?.categories().context("could not load categories")?;
    if categories.is_empty() {
        println!("No categories yet.");
    }
    for category in categories {
        println!("{}", category.name);
    }
    Ok(())
}

pub(crate) fn cmd_category(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let name = validate::required("category", name)?;
    let posts = ctx
        .store()?
        .published_in_category(name)
        .with_context(|| format!("could not load posts in {name}"))?;

    let p = &ctx.palette;
    println!("{}", render::section(name, p));
    if posts.is_empty() {
        println!("No posts in this category yet.");
    }
    let width = ctx.width();
    for post in &posts {
        println!("{}", render::post_line(post, p, width));
    }
    Ok(())
}

pub(crate) fn cmd_comment(ctx: &Context, post_id: i64, text: &str) -> anyhow::Result<()> {
    let content = validate::required("comment", text)?;
    let (store, session) = ctx.user_store()?;
    let comment = store
        .add_comment(&NewComment {
            post_id,
            user_id: session.user.id.clone(),
            content: content.to_string(),
        })
        .context("failed to post comment")?;
    info!("comment {} added to post {post_id}", comment.id);
    println!("Comment posted to #{post_id}.");
    Ok(())
}

pub(crate) fn cmd_open(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let post = ctx
        .store()?
        .published_post(id)
        .with_context(|| format!("could not load post #{id}"))?;
    let link = syndication::post_link(&ctx.settings.site_url, post.id);
    println!("Opening {link}");
    open::that(&link).map_err(|e| anyhow::anyhow!("could not open {link}: {e}"))?;
    Ok(())
}
