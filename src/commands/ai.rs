use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use chrono::Utc;
use clap::Subcommand;
use itertools::Itertools;
use log::debug;

use crate::genai::{self, Conversation};
use crate::model::{PostFields, PostStatus};
use crate::store::{POST_BUCKET, object_name};
use crate::validate;

use super::{Context, read_text};

#[derive(Subcommand)]
pub(crate) enum AiCommand {
    /// Write a complete article about a topic
    Write { topic: String },
    /// Suggest an SEO title, description and keywords for an article
    Seo {
        #[command(flatten)]
        source: ArticleSource,
    },
    /// Summarize an article in a few bullet points
    Summarize {
        #[command(flatten)]
        source: ArticleSource,
    },
    /// Generate a cover image for a post title
    Image {
        title: String,
        /// Save the image to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Upload the image to the post image bucket and print its address
        #[arg(long)]
        upload: bool,
    },
    /// Turn a YouTube video into a bilingual post
    Youtube {
        /// Video link; the transcript is fetched from the transcript service
        #[arg(required_unless_present = "transcript_file")]
        link: Option<String>,
        /// Use a transcript from a file ("-" for stdin) instead of fetching one
        #[arg(long, value_name = "PATH", conflicts_with = "link")]
        transcript_file: Option<PathBuf>,
        /// Store the result as a draft post
        #[arg(long, requires = "category")]
        save: bool,
        /// Category of the saved draft
        #[arg(long)]
        category: Option<String>,
    },
    /// Talk to the writing assistant, one message per line
    Chat,
}

/// Where an article's text comes from: a stored post, a file, or stdin.
#[derive(clap::Args, Debug)]
pub(crate) struct ArticleSource {
    /// Use the body of this post
    #[arg(long, conflicts_with = "file")]
    post: Option<i64>,
    /// Read the article from a file instead of stdin
    #[arg(long)]
    file: Option<PathBuf>,
}

pub(crate) fn run(ctx: &Context, command: AiCommand) -> anyhow::Result<()> {
    match command {
        AiCommand::Write { topic } => cmd_write(ctx, &topic),
        AiCommand::Seo { source } => cmd_seo(ctx, &source),
        AiCommand::Summarize { source } => cmd_summarize(ctx, &source),
        AiCommand::Image {
            title,
            output,
            upload,
        } => cmd_image(ctx, &title, output.as_deref(), upload),
        AiCommand::Youtube {
            link,
            transcript_file,
            save,
            category,
        } => cmd_youtube(
            ctx,
            link.as_deref(),
            transcript_file.as_deref(),
            save.then_some(category.as_deref().unwrap_or_default()),
        ),
        AiCommand::Chat => cmd_chat(ctx),
    }
}

fn cmd_write(ctx: &Context, topic: &str) -> anyhow::Result<()> {
    let topic = validate::required("topic", topic)?;
    let generator = ctx.generator()?;
    let pb = crate::http::spinner(format!("Writing about {topic}"));
    let article = genai::write_article(&generator, topic);
    pb.finish_and_clear();
    let article = article?;

    println!("# {}", article.title);
    println!();
    println!("{}", article.content.trim());
    println!();
    println!("Meta description: {}", article.meta_description);
    println!("Keywords: {}", article.keywords.iter().join(", "));
    Ok(())
}

fn article_text(ctx: &Context, source: &ArticleSource) -> anyhow::Result<String> {
    match source.post {
        Some(id) => Ok(ctx
            .store()?
            .post(id)
            .with_context(|| format!("could not load post #{id}"))?
            .content),
        None => read_text(source.file.as_deref()),
    }
}

fn cmd_seo(ctx: &Context, source: &ArticleSource) -> anyhow::Result<()> {
    let text = article_text(ctx, source)?;
    let content = validate::required("content", &text)?;
    let generator = ctx.generator()?;
    let pb = crate::http::spinner("Suggesting SEO metadata");
    let seo = genai::suggest_seo(&generator, content);
    pb.finish_and_clear();
    let seo = seo?;

    println!("Title: {}", seo.seo_title);
    println!("Meta description: {}", seo.meta_description);
    println!("Keywords: {}", seo.keywords.iter().join(", "));
    Ok(())
}

fn cmd_summarize(ctx: &Context, source: &ArticleSource) -> anyhow::Result<()> {
    let text = article_text(ctx, source)?;
    let content = validate::required("content", &text)?;
    let generator = ctx.generator()?;
    let pb = crate::http::spinner("Summarizing");
    let summary = genai::summarize(&generator, content);
    pb.finish_and_clear();
    println!("{}", summary?);
    Ok(())
}

fn cmd_image(ctx: &Context, title: &str, output: Option<&Path>, upload: bool) -> anyhow::Result<()> {
    let title = validate::required("title", title)?;
    if output.is_none() && !upload {
        bail!("nowhere to put the image; pass --output PATH and/or --upload");
    }
    let generator = ctx.generator()?;
    let pb = crate::http::spinner("Generating image");
    let bytes = genai::thumbnail(&generator, title);
    pb.finish_and_clear();
    let bytes = bytes?;

    if let Some(path) = output {
        std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved {}", path.display());
    }
    if upload {
        let (store, _) = ctx.user_store()?;
        let name = object_name(None, "ai_generated.jpg", Utc::now());
        let url = store
            .upload(POST_BUCKET, &name, bytes, "image/jpeg")
            .context("failed to upload image")?;
        println!("{url}");
    }
    Ok(())
}

fn cmd_youtube(
    ctx: &Context,
    link: Option<&str>,
    transcript_file: Option<&Path>,
    save_in: Option<&str>,
) -> anyhow::Result<()> {
    let transcript = match (link, transcript_file) {
        (_, Some(path)) => read_text((path != Path::new("-")).then_some(path))?,
        (Some(link), None) => {
            let pb = crate::http::spinner("Fetching transcript");
            let fetched = ctx.transcripts().fetch(link);
            pb.finish_and_clear();
            fetched.context(
                "could not fetch the transcript; the video may have none, \
                 pass it with --transcript-file instead",
            )?
        }
        (None, None) => bail!("give a video link or --transcript-file"),
    };
    let transcript = validate::required("transcript", &transcript)?;

    let generator = ctx.generator()?;
    let pb = crate::http::spinner("Writing post");
    let post = genai::transcript_to_post(&generator, transcript);
    pb.finish_and_clear();
    let post = post?;

    match save_in {
        None => {
            println!("# {}", post.title);
            println!();
            println!("{}", post.content);
        }
        Some(category) => {
            let (store, session) = ctx.user_store()?;
            let draft = PostFields {
                meta_title: post.title.clone(),
                title: post.title,
                content: post.content,
                category: category.trim().to_string(),
                status: PostStatus::Draft,
                author: session.email().to_string(),
                ..PostFields::default()
            };
            validate::post(&draft)?;
            let saved = store.create_post(&draft).context("failed to save draft")?;
            println!("Saved draft #{}: {}", saved.id, saved.title);
        }
    }
    Ok(())
}

fn cmd_chat(ctx: &Context) -> anyhow::Result<()> {
    let generator = ctx.generator()?;
    let interactive = std::io::stdin().is_terminal();
    let mut conversation = Conversation::new();
    let p = &ctx.palette;

    if interactive {
        eprintln!("Ask the writing assistant anything. End with Ctrl-D.");
        eprint!("> ");
        std::io::stderr().flush()?;
    }
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let message = line.trim();
        if !message.is_empty() {
            let pb = crate::http::spinner("Thinking");
            let reply = conversation.send(&generator, message).map(str::to_string);
            pb.finish_and_clear();
            match reply {
                Ok(reply) => println!("{}\n", reply.trim()),
                Err(e) => eprintln!("{}{e}{}", p.error, p.reset),
            }
        }
        if interactive {
            eprint!("> ");
            std::io::stderr().flush()?;
        }
    }
    debug!("conversation ended after {} messages", conversation.history().len());
    Ok(())
}
