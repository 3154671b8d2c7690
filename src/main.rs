mod auth;
mod commands;
mod config;
mod editor;
mod genai;
mod http;
mod model;
mod render;
mod store;
mod syndication;
mod validate;
mod youtube;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use commands::Context;
use commands::admin::AdminCommand;
use commands::ai::AiCommand;
use config::Settings;
use syndication::Format;

/// Read and run a blog from the terminal
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(flatten)]
    settings: Settings,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Latest posts with sponsored entries, trending posts and categories
    Home {
        /// Only show posts whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Published posts, one page at a time
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Only show posts whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Read a published post with its comments
    Read { id: i64 },
    /// List categories
    Categories,
    /// Published posts filed under a category
    Category { name: String },
    /// Comment on a post
    Comment { post_id: i64, text: String },
    /// Search as you type: each line on stdin is the current search text
    Search {
        /// Quiet period before a search is sent
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },
    /// Open a post in the browser
    Open { id: i64 },
    /// Write an RSS or Atom feed of the latest posts
    Export {
        #[arg(short, long, value_enum, default_value_t = Format::Rss)]
        format: Format,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
        /// Feed title
        #[arg(long, default_value = "Blog")]
        title: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        name: String,
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Repeat the password
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Manage the blog (requires `blog login`)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Writing tools backed by the generative API
    Ai {
        #[command(subcommand)]
        command: AiCommand,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    config::init_logger(&args.verbose);
    let ctx = Context::new(args.settings)?;

    match args.command.unwrap_or(Command::Home { search: None }) {
        Command::Home { search } => commands::home::cmd_home(&ctx, search.as_deref()),
        Command::List { page, search } => commands::list::cmd_list(&ctx, page, search.as_deref()),
        Command::Read { id } => commands::read::cmd_read(&ctx, id),
        Command::Categories => commands::browse::cmd_categories(&ctx),
        Command::Category { name } => commands::browse::cmd_category(&ctx, &name),
        Command::Comment { post_id, text } => commands::browse::cmd_comment(&ctx, post_id, &text),
        Command::Search { debounce_ms } => {
            commands::search::cmd_search(&ctx, Duration::from_millis(debounce_ms))
        }
        Command::Open { id } => commands::browse::cmd_open(&ctx, id),
        Command::Export {
            format,
            limit,
            title,
            output,
        } => commands::export::cmd_export(&ctx, format, limit, &title, output.as_deref()),
        Command::Login { email, password } => commands::auth::cmd_login(&ctx, &email, password),
        Command::Signup {
            name,
            email,
            password,
            confirm,
        } => commands::auth::cmd_signup(&ctx, &name, &email, password, confirm),
        Command::Logout => commands::auth::cmd_logout(&ctx),
        Command::Admin { command } => commands::admin::run(&ctx, command),
        Command::Ai { command } => commands::ai::run(&ctx, command),
    }
}
