use log::warn;

use crate::commands::Context;
use crate::render;
use crate::store::{CATEGORIES, COMMENTS, POSTS, Store};

pub(super) fn cmd_dashboard(ctx: &Context, store: &Store) -> anyhow::Result<()> {
    let (posts, (categories, comments)) = rayon::join(
        || store.count(POSTS),
        || rayon::join(|| store.count(CATEGORIES), || store.count(COMMENTS)),
    );

    let p = &ctx.palette;
    println!("{}", render::section("Dashboard", p));
    for (label, count) in [
        ("Posts", posts),
        ("Categories", categories),
        ("Comments", comments),
    ] {
        match count {
            Ok(n) => println!("{label:<12}{}{n}{}", p.bold, p.reset),
            Err(e) => {
                warn!("could not count {}: {e}", label.to_lowercase());
                println!(
                    "{label:<12}{}",
                    render::unavailable(&label.to_lowercase(), p)
                );
            }
        }
    }
    Ok(())
}
