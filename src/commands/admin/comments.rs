use anyhow::Context as _;

use crate::commands::{Context, confirm};
use crate::render;
use crate::store::Store;

pub(super) fn cmd_ls(ctx: &Context, store: &Store) -> anyhow::Result<()> {
    let comments = store.all_comments().context("could not load comments")?;
    if comments.is_empty() {
        println!("No comments yet.");
        return Ok(());
    }
    let p = &ctx.palette;
    let width = ctx.width();
    for comment in &comments {
        println!(
            "{}#{}{} on {}{}{}",
            p.bold,
            comment.id,
            p.reset,
            p.italic,
            render::truncate(comment.post_title(), width.saturating_sub(12)),
            p.reset
        );
        println!("{}", render::comment(comment, p));
        println!();
    }
    Ok(())
}

pub(super) fn cmd_rm(store: &Store, id: i64, yes: bool) -> anyhow::Result<()> {
    if !confirm(&format!("delete comment #{id}"), yes)? {
        println!("Kept comment #{id}.");
        return Ok(());
    }
    store
        .delete_comment(id)
        .with_context(|| format!("failed to delete comment #{id}"))?;
    println!("Deleted comment #{id}.");
    Ok(())
}
