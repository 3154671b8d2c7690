use std::fmt::Write;

use anyhow::Context as _;
use itertools::Itertools;
use log::warn;

use crate::model::{Comment, Post};
use crate::render::{self, Palette};
use crate::store::StoreError;

use super::Context;

const RELATED: usize = 3;

pub(crate) fn cmd_read(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let post = store
        .published_post(id)
        .with_context(|| format!("could not load post #{id}"))?;
    let (comments, related) = rayon::join(
        || store.comments_for(post.id),
        || store.related_posts(&post, RELATED),
    );
    print!(
        "{}",
        render_post(&post, &comments, &related, &ctx.palette, ctx.width())
    );
    Ok(())
}

fn render_post(
    post: &Post,
    comments: &Result<Vec<Comment>, StoreError>,
    related: &Result<Vec<Post>, StoreError>,
    p: &Palette,
    width: usize,
) -> String {
    let mut out = String::new();
    writeln!(out, "{}{}{}", p.bold, post.title, p.reset).unwrap();
    let mut byline = vec![render::format_date(&post.created_at)];
    if !post.author.is_empty() {
        byline.push(format!("by {}", post.author));
    }
    if !post.category.is_empty() {
        byline.push(post.category.clone());
    }
    writeln!(out, "{}{}{}", p.dim, byline.join(" · "), p.reset).unwrap();
    if let Some(image) = post.image() {
        writeln!(out, "{}{image}{}", p.dim, p.reset).unwrap();
    }
    writeln!(out).unwrap();

    if let Some(summary) = post.summary() {
        writeln!(out, "{}", render::section("Quick summary", p)).unwrap();
        writeln!(out, "{}", summary.trim()).unwrap();
        writeln!(out).unwrap();
    }

    writeln!(out, "{}", render::plain_text(&post.content)).unwrap();
    writeln!(out).unwrap();

    if !post.keywords.is_empty() {
        writeln!(
            out,
            "{}{}{}",
            p.dim,
            post.keywords.iter().map(|k| format!("#{k}")).join(" "),
            p.reset
        )
        .unwrap();
        writeln!(out).unwrap();
    }

    match comments {
        Ok(comments) => {
            writeln!(
                out,
                "{}",
                render::section(&format!("Comments ({})", comments.len()), p)
            )
            .unwrap();
            if comments.is_empty() {
                writeln!(out, "No comments yet.").unwrap();
            }
            for comment in comments {
                writeln!(out, "{}", render::comment(comment, p)).unwrap();
            }
        }
        Err(e) => {
            warn!("could not load comments: {e}");
            writeln!(out, "{}", render::section("Comments", p)).unwrap();
            writeln!(out, "{}", render::unavailable("comments", p)).unwrap();
        }
    }

    match related {
        Ok(related) if related.is_empty() => {}
        Ok(related) => {
            writeln!(out).unwrap();
            writeln!(out, "{}", render::section("Related posts", p)).unwrap();
            for post in related {
                writeln!(out, "{}", render::post_line(post, p, width)).unwrap();
            }
        }
        Err(e) => warn!("could not load related posts: {e}"),
    }
    out
}
