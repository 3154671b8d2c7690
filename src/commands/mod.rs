pub mod admin;
pub mod ai;
pub mod auth;
pub mod browse;
pub mod export;
pub mod home;
pub mod list;
pub mod read;
pub mod search;

use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{Context as _, bail};

use crate::auth::Session;
use crate::config::Settings;
use crate::genai::Gemini;
use crate::render::{self, Palette};
use crate::store::Store;
use crate::youtube::TranscriptClient;

/// Everything a command needs to reach the remote services and the terminal.
pub(crate) struct Context {
    pub settings: Settings,
    pub palette: Palette,
    client: reqwest::blocking::Client,
}

impl Context {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        Ok(Self {
            settings,
            palette: Palette::detect(),
            client: crate::http::http_client()?,
        })
    }

    pub fn width(&self) -> usize {
        render::terminal_width()
    }

    /// Store client acting anonymously.
    pub fn store(&self) -> anyhow::Result<Store> {
        Store::new(
            self.client.clone(),
            self.settings.store_url()?,
            self.settings.store_key(),
        )
        .context("invalid BLOG_STORE_URL")
    }

    pub fn session(&self) -> anyhow::Result<Option<Session>> {
        Session::load(&self.settings.session_path())
    }

    pub fn require_session(&self) -> anyhow::Result<Session> {
        match self.session()? {
            Some(session) => Ok(session),
            None => bail!("not signed in; run `blog login <EMAIL>` first"),
        }
    }

    /// Store client acting as the signed-in user.
    pub fn user_store(&self) -> anyhow::Result<(Store, Session)> {
        let session = self.require_session()?;
        let store = self.store()?.with_token(&session.access_token);
        Ok((store, session))
    }

    pub fn generator(&self) -> anyhow::Result<Gemini> {
        let s = &self.settings;
        Ok(Gemini::new(
            self.client.clone(),
            &s.genai_url,
            s.genai_key()?,
            &s.text_model,
            &s.image_model,
        )?)
    }

    pub fn transcripts(&self) -> TranscriptClient {
        TranscriptClient::new(
            self.client.clone(),
            &self.settings.transcript_url,
            self.settings.transcript_key.as_deref(),
        )
    }
}

/// Ask on stderr and read one line from stdin.
pub(crate) fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Confirm a destructive action, unless `yes` was given up front.
pub(crate) fn confirm(question: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        bail!("refusing to {question} without confirmation; pass --yes");
    }
    let answer = prompt(&format!("{question}? [y/N] "))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Contents of `file`, or all of stdin when no file is given.
pub(crate) fn read_text(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read from stdin")?;
            Ok(text)
        }
    }
}
