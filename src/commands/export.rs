use std::path::Path;

use anyhow::Context as _;
use log::info;

use crate::syndication::{self, Format, Site};

use super::Context;

pub(crate) fn cmd_export(
    ctx: &Context,
    format: Format,
    limit: usize,
    title: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let posts = ctx
        .store()?
        .latest_published(limit)
        .context("could not load posts")?;
    let site = Site {
        title,
        url: &ctx.settings.site_url,
    };
    let document = syndication::render(format, &site, &posts);
    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} posts to {}", posts.len(), path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}
