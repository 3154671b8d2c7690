use anyhow::Context as _;
use log::warn;

use crate::commands::confirm;
use crate::store::Store;
use crate::validate;

pub(super) fn cmd_ls(store: &Store) -> anyhow::Result<()> {
    let categories = store.categories().context("could not load categories")?;
    if categories.is_empty() {
        println!("No categories yet.");
    }
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

pub(super) fn cmd_add(store: &Store, name: &str) -> anyhow::Result<()> {
    let name = validate::required("name", name)?;
    let category = store
        .create_category(name)
        .context("failed to create category")?;
    println!("Created category #{} {}.", category.id, category.name);
    Ok(())
}

/// Posts copy the category name when saved, so a rename leaves them behind.
pub(super) fn cmd_rename(store: &Store, id: i64, name: &str) -> anyhow::Result<()> {
    let name = validate::required("name", name)?;
    let old = store
        .category(id)
        .with_context(|| format!("could not load category #{id}"))?;
    store
        .rename_category(id, name)
        .with_context(|| format!("failed to rename category #{id}"))?;
    println!("Renamed {} to {name}.", old.name);

    match store.count_posts_labelled(&old.name) {
        Ok(0) => {}
        Ok(n) => println!(
            "{n} post{} still filed under \"{}\".",
            if n == 1 { " is" } else { "s are" },
            old.name
        ),
        Err(e) => warn!("could not count posts labelled {}: {e}", old.name),
    }
    Ok(())
}

pub(super) fn cmd_rm(store: &Store, id: i64, yes: bool) -> anyhow::Result<()> {
    if !confirm(&format!("delete category #{id}"), yes)? {
        println!("Kept category #{id}.");
        return Ok(());
    }
    store
        .delete_category(id)
        .with_context(|| format!("failed to delete category #{id}"))?;
    println!("Deleted category #{id}.");
    Ok(())
}
