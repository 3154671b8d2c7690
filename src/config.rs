use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::TimestampPrecision;
use feedmix::{Cadence, Pagination};

/// Connection and presentation settings, shared by every subcommand.
///
/// Each value can come from a flag, the environment, or a `.env` file in the
/// working directory.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Base URL of the content store (auth, rest and storage live under it)
    #[arg(long, env = "BLOG_STORE_URL", global = true)]
    pub store_url: Option<String>,

    /// Public API key of the content store
    #[arg(long, env = "BLOG_STORE_KEY", global = true, hide_env_values = true)]
    pub store_key: Option<String>,

    /// Base URL of the generative API
    #[arg(
        long,
        env = "BLOG_GENAI_URL",
        global = true,
        default_value = "https://generativelanguage.googleapis.com"
    )]
    pub genai_url: String,

    /// API key of the generative API
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub genai_key: Option<String>,

    /// Model used for text generation
    #[arg(long, env = "BLOG_TEXT_MODEL", global = true, default_value = "gemini-2.5-flash")]
    pub text_model: String,

    /// Model used for image generation
    #[arg(
        long,
        env = "BLOG_IMAGE_MODEL",
        global = true,
        default_value = "imagen-4.0-generate-001"
    )]
    pub image_model: String,

    /// Base URL of the YouTube transcript service
    #[arg(
        long,
        env = "BLOG_TRANSCRIPT_URL",
        global = true,
        default_value = "https://www.youtube-transcript.io"
    )]
    pub transcript_url: String,

    /// API key of the YouTube transcript service
    #[arg(long, env = "BLOG_TRANSCRIPT_KEY", global = true, hide_env_values = true)]
    pub transcript_key: Option<String>,

    /// Public address of the blog, used for links and syndication
    #[arg(long, env = "BLOG_SITE_URL", global = true, default_value = "http://localhost:5173")]
    pub site_url: String,

    /// Posts between sponsored entries in the home feed, or "off"
    #[arg(long, env = "BLOG_AD_STRIDE", global = true, default_value = "3")]
    pub ad_stride: Cadence,

    /// Posts per page in `blog list`
    #[arg(long, env = "BLOG_PAGE_SIZE", global = true, default_value_t = 6)]
    pub page_size: usize,

    /// Where the login session is kept
    #[arg(long, env = "BLOG_SESSION", global = true)]
    pub session_file: Option<PathBuf>,
}

impl Settings {
    pub fn store_url(&self) -> anyhow::Result<&str> {
        self.store_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("BLOG_STORE_URL is not set")
    }

    pub fn store_key(&self) -> &str {
        self.store_key.as_deref().unwrap_or_default()
    }

    pub fn genai_key(&self) -> anyhow::Result<&str> {
        self.genai_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .context("GEMINI_API_KEY is not set")
    }

    pub fn pagination(&self) -> anyhow::Result<Pagination> {
        Pagination::new(self.page_size).context("invalid BLOG_PAGE_SIZE")
    }

    pub fn session_path(&self) -> PathBuf {
        if let Some(path) = &self.session_file {
            return path.clone();
        }
        dirs::config_dir()
            .map(|dir| dir.join("blogdesk").join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".blogdesk-session.json"))
    }
}

pub fn init_logger(verbose: &Verbosity<WarnLevel>) {
    let detailed = verbose
        .log_level()
        .is_some_and(|level| level >= log::Level::Debug);
    env_logger::Builder::new()
        .format_timestamp(detailed.then_some(TimestampPrecision::Millis))
        .format_target(detailed)
        .filter_level(verbose.log_level_filter())
        .init();
}
