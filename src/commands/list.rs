use std::fmt::Write;

use feedmix::{Cadence, ListingState, Pagination, arrange};
use log::warn;

use crate::model::Advertisement;
use crate::render::{self, Palette};
use crate::store::{PostPage, StoreError};

use super::Context;

pub(crate) fn cmd_list(ctx: &Context, page: usize, search: Option<&str>) -> anyhow::Result<()> {
    let state = ListingState::with_page(page, search.unwrap_or_default())?;
    let pagination = ctx.settings.pagination()?;
    let range = pagination.range(state.page())?;

    let store = ctx.store()?;
    let (listing, ads) = rayon::join(
        || store.published_page(state.query(), range),
        || store.active_ads(),
    );
    if let Err(e) = &listing {
        warn!("could not load posts: {e}");
    }
    let ads = ads.unwrap_or_else(|e| {
        warn!("could not load advertisements: {e}");
        Vec::new()
    });

    print!(
        "{}",
        render_listing(
            &state,
            &pagination,
            &listing,
            &ads,
            ctx.settings.ad_stride,
            &ctx.palette,
            ctx.width(),
        )
    );
    Ok(())
}

fn render_listing(
    state: &ListingState,
    pagination: &Pagination,
    listing: &Result<PostPage, StoreError>,
    ads: &[Advertisement],
    cadence: Cadence,
    p: &Palette,
    width: usize,
) -> String {
    let mut out = String::new();
    let heading = if state.query().is_empty() {
        "All posts".to_string()
    } else {
        format!("Results for \"{}\"", state.query())
    };
    writeln!(out, "{}", render::section(&heading, p)).unwrap();

    let Ok(listing) = listing else {
        writeln!(out, "{}", render::unavailable("posts", p)).unwrap();
        return out;
    };
    if listing.posts.is_empty() {
        writeln!(out, "No posts found.").unwrap();
    } else {
        let page = arrange(&listing.posts, ads, cadence);
        write!(out, "{}", render::feed(&page.entries, p, width)).unwrap();
    }

    let total_pages = pagination.total_pages(listing.total);
    if total_pages > 1 {
        writeln!(out).unwrap();
        write!(out, "Page {} of {total_pages}", state.page()).unwrap();
        let mut hints = Vec::new();
        if state.has_prev() {
            hints.push(format!("--page {}", state.page() - 1));
        }
        if state.has_next(total_pages) {
            hints.push(format!("--page {}", state.page() + 1));
        }
        if !hints.is_empty() {
            write!(out, "  {}({}){}", p.dim, hints.join(" | "), p.reset).unwrap();
        }
        writeln!(out).unwrap();
    }
    out
}
