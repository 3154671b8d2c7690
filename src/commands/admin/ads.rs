use anyhow::Context as _;

use crate::commands::{Context, confirm};
use crate::model::AdFields;
use crate::render;
use crate::store::{AD_BUCKET, Store};
use crate::validate;

use super::{AdForm, upload_file};

const AD_PREFIX: &str = "ads";

pub(super) fn cmd_ls(ctx: &Context, store: &Store) -> anyhow::Result<()> {
    let ads = store.all_ads().context("could not load advertisements")?;
    if ads.is_empty() {
        println!("No advertisements yet.");
        return Ok(());
    }
    let p = &ctx.palette;
    let width = ctx.width();
    for ad in &ads {
        let state = if ad.active { "active" } else { "inactive" };
        println!(
            "{:>4}  {}{state:<8}{}  {}",
            ad.id,
            p.dim,
            p.reset,
            render::ad_line(ad, p, width.saturating_sub(16))
        );
    }
    Ok(())
}

pub(super) fn cmd_add(store: &Store, form: AdForm) -> anyhow::Result<()> {
    let mut fields = AdFields::default();
    fill(store, &mut fields, form)?;
    let ad = store
        .create_ad(&fields)
        .context("failed to create advertisement")?;
    println!("Created advertisement #{} ({}).", ad.id, status(ad.active));
    Ok(())
}

pub(super) fn cmd_edit(store: &Store, id: i64, form: AdForm) -> anyhow::Result<()> {
    let existing = store
        .ad(id)
        .with_context(|| format!("could not load advertisement #{id}"))?;
    let mut fields = AdFields::from(&existing);
    fill(store, &mut fields, form)?;
    store
        .update_ad(id, &fields)
        .with_context(|| format!("failed to update advertisement #{id}"))?;
    println!("Updated advertisement #{id} ({}).", status(fields.active));
    Ok(())
}

pub(super) fn cmd_set_active(store: &Store, ids: &[i64], active: bool) -> anyhow::Result<()> {
    validate::selection(ids)?;
    store
        .set_ads_active(ids, active)
        .context("failed to update advertisements")?;
    println!("Marked {} advertisement(s) {}.", ids.len(), status(active));
    Ok(())
}

pub(super) fn cmd_rm(store: &Store, ids: &[i64], yes: bool) -> anyhow::Result<()> {
    validate::selection(ids)?;
    if !confirm(&format!("delete {} advertisement(s)", ids.len()), yes)? {
        println!("Kept advertisements.");
        return Ok(());
    }
    store
        .delete_ads(ids)
        .context("failed to delete advertisements")?;
    println!("Deleted {} advertisement(s).", ids.len());
    Ok(())
}

fn status(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

/// Title and link are checked before any upload so a rejected form sends
/// nothing.
fn fill(store: &Store, fields: &mut AdFields, form: AdForm) -> anyhow::Result<()> {
    apply_form(fields, &form);
    validate::required("title", &fields.title)?;
    validate::required("link", &fields.link)?;
    if let Some(path) = &form.image {
        fields.image_url = upload_file(store, AD_BUCKET, Some(AD_PREFIX), path)?;
    }
    validate::ad(fields)?;
    Ok(())
}

fn apply_form(fields: &mut AdFields, form: &AdForm) {
    let set = |field: &mut String, value: &Option<String>| {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    };
    set(&mut fields.title, &form.title);
    set(&mut fields.description, &form.description);
    set(&mut fields.link, &form.link);
    set(&mut fields.image_url, &form.image_url);
    if form.active {
        fields.active = true;
    }
    if form.inactive {
        fields.active = false;
    }
}
