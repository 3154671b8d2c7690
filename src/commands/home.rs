use std::fmt::Write;

use feedmix::{Cadence, arrange, hero};
use itertools::Itertools;
use log::warn;

use crate::model::{Advertisement, Category, Post};
use crate::render::{self, Palette};
use crate::store::StoreError;

use super::Context;

const TRENDING: usize = 5;
const POPULAR: usize = 4;

pub(crate) fn cmd_home(ctx: &Context, search: Option<&str>) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let ((posts, categories), ads) = rayon::join(
        || rayon::join(|| store.published_posts(), || store.categories()),
        || store.active_ads(),
    );
    print!(
        "{}",
        render_home(
            &posts,
            &categories,
            ads,
            search.unwrap_or_default(),
            ctx.settings.ad_stride,
            &ctx.palette,
            ctx.width(),
        )
    );
    Ok(())
}

/// Case-insensitive title match; a blank term matches everything.
pub(crate) fn title_matches(post: &Post, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || post.title.to_lowercase().contains(&term.to_lowercase())
}

fn render_home(
    posts: &Result<Vec<Post>, StoreError>,
    categories: &Result<Vec<Category>, StoreError>,
    ads: Result<Vec<Advertisement>, StoreError>,
    search: &str,
    cadence: Cadence,
    p: &Palette,
    width: usize,
) -> String {
    let ads = ads.unwrap_or_else(|e| {
        warn!("could not load advertisements: {e}");
        Vec::new()
    });
    let mut out = String::new();

    let search = search.trim();
    let heading = if search.is_empty() {
        "Latest posts".to_string()
    } else {
        format!("Results for \"{search}\"")
    };

    match posts {
        Ok(posts) => {
            let visible: Vec<Post> = posts
                .iter()
                .filter(|post| title_matches(post, search))
                .cloned()
                .collect();
            let page = arrange(&visible, &ads, cadence);
            if let Some(ad) = page.hero {
                writeln!(out, "{}", render::hero(ad, p)).unwrap();
            }
            writeln!(out, "{}", render::section(&heading, p)).unwrap();
            if page.entries.is_empty() {
                writeln!(out, "No posts found.").unwrap();
            } else {
                write!(out, "{}", render::feed(&page.entries, p, width)).unwrap();
            }
            writeln!(out).unwrap();

            let ranked = if posts.is_empty() {
                &[][..]
            } else {
                &[("Trending", TRENDING), ("Popular", POPULAR)][..]
            };
            for &(title, count) in ranked {
                writeln!(out, "{}", render::section(title, p)).unwrap();
                for (i, post) in posts.iter().take(count).enumerate() {
                    let line = render::truncate(&post.title, width.saturating_sub(10));
                    writeln!(out, "{:>2}. {line} {}#{}{}", i + 1, p.dim, post.id, p.reset)
                        .unwrap();
                }
                writeln!(out).unwrap();
            }
        }
        Err(e) => {
            warn!("could not load posts: {e}");
            if let Some(ad) = hero(&ads) {
                writeln!(out, "{}", render::hero(ad, p)).unwrap();
            }
            writeln!(out, "{}", render::section(&heading, p)).unwrap();
            writeln!(out, "{}", render::unavailable("posts", p)).unwrap();
            writeln!(out).unwrap();
        }
    }

    writeln!(out, "{}", render::section("Categories", p)).unwrap();
    match categories {
        Ok(categories) if categories.is_empty() => writeln!(out, "No categories yet.").unwrap(),
        Ok(categories) => {
            writeln!(out, "{}", categories.iter().map(|c| &c.name).join(", ")).unwrap()
        }
        Err(e) => {
            warn!("could not load categories: {e}");
            writeln!(out, "{}", render::unavailable("categories", p)).unwrap();
        }
    }
    out
}
