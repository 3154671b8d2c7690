use anyhow::Context as _;
use log::{info, warn};

use crate::auth::Session;
use crate::model::Profile;
use crate::validate;

use super::{Context, prompt};

fn password_or_prompt(given: Option<String>, label: &str) -> anyhow::Result<(String, bool)> {
    match given {
        Some(password) => Ok((password, false)),
        None => Ok((prompt(label)?, true)),
    }
}

pub(crate) fn cmd_login(ctx: &Context, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let email = validate::required("email", email)?;
    let (password, _) = password_or_prompt(password, "Password: ")?;
    let password = validate::required("password", &password)?;

    let session = ctx
        .store()?
        .sign_in(email, password)
        .context("sign in failed")?;
    let path = ctx.settings.session_path();
    session.save(&path)?;
    info!("session stored in {}", path.display());
    println!("Signed in as {}.", session.email());
    Ok(())
}

pub(crate) fn cmd_signup(
    ctx: &Context,
    name: &str,
    email: &str,
    password: Option<String>,
    confirmation: Option<String>,
) -> anyhow::Result<()> {
    let name = validate::required("name", name)?;
    let email = validate::required("email", email)?;
    let (password, prompted) = password_or_prompt(password, "Password: ")?;
    let confirmation = match confirmation {
        Some(confirmation) => confirmation,
        None if prompted => prompt("Confirm password: ")?,
        None => password.clone(),
    };
    validate::passwords(&password, &confirmation)?;

    let store = ctx.store()?;
    let signup = store
        .sign_up(name, email, &password)
        .context("sign up failed")?;

    let profile = Profile {
        id: signup.user.id.clone(),
        name: name.to_string(),
    };
    let profile_store = match &signup.session {
        Some(session) => store.clone().with_token(&session.access_token),
        None => store,
    };
    if let Err(e) = profile_store.create_profile(&profile) {
        warn!("profile insert failed: {e}");
        println!("Account created, but failed to set up profile.");
        return Ok(());
    }
    println!("Account created for {email}. Sign in with `blog login {email}`.");
    Ok(())
}

pub(crate) fn cmd_logout(ctx: &Context) -> anyhow::Result<()> {
    let path = ctx.settings.session_path();
    let Some(session) = ctx.session()? else {
        println!("Not signed in.");
        return Ok(());
    };
    let store = ctx.store()?.with_token(&session.access_token);
    if let Err(e) = store.sign_out() {
        warn!("server-side sign out failed: {e}");
    }
    Session::clear(&path)?;
    println!("Signed out.");
    Ok(())
}
