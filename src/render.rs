use std::fmt::Write;
use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use feedmix::FeedEntry;
use itertools::Itertools;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{Advertisement, Comment, Post};

const FALLBACK_WIDTH: usize = 80;

/// ANSI escapes, all empty when stdout is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bold: &'static str,
    pub dim: &'static str,
    pub italic: &'static str,
    pub accent: &'static str,
    pub sponsor: &'static str,
    pub error: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        if color {
            Self {
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                italic: "\x1b[3m",
                accent: "\x1b[36m",
                sponsor: "\x1b[33m",
                error: "\x1b[31m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                bold: "",
                dim: "",
                italic: "",
                accent: "",
                sponsor: "",
                error: "",
                reset: "",
            }
        }
    }

    pub fn detect() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }
}

pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `2024-01-15  #12 Title (Category)`, with the title shortened to fit `width`.
pub fn post_line(post: &Post, p: &Palette, width: usize) -> String {
    let date = format_date(&post.created_at);
    let id = format!("#{}", post.id);
    let category = if post.category.is_empty() {
        String::new()
    } else {
        format!(" ({})", post.category)
    };
    let fixed = date.width() + 2 + id.width() + 1 + category.width();
    let title = truncate(&post.title, width.saturating_sub(fixed).max(10));
    let meta = if category.is_empty() {
        String::new()
    } else {
        format!("{}{}{category}{}", p.dim, p.italic, p.reset)
    };
    format!(
        "{}{date}{}  {}{id}{} {title}{meta}",
        p.accent, p.reset, p.bold, p.reset
    )
}

pub fn ad_line(ad: &Advertisement, p: &Palette, width: usize) -> String {
    let label = "[sponsored]";
    let fixed = label.width() + 1 + ad.link.width() + 1;
    let title = truncate(&ad.title, width.saturating_sub(fixed).max(10));
    format!(
        "{}{label}{} {title} {}{}{}",
        p.sponsor, p.reset, p.dim, ad.link, p.reset
    )
}

pub fn hero(ad: &Advertisement, p: &Palette) -> String {
    let mut out = String::new();
    writeln!(out, "{}{}★ {}{}", p.sponsor, p.bold, ad.title, p.reset).unwrap();
    if !ad.description.is_empty() {
        writeln!(out, "  {}", ad.description).unwrap();
    }
    writeln!(out, "  {}{}{}", p.dim, ad.link, p.reset).unwrap();
    out
}

pub fn feed(entries: &[FeedEntry<&Post, &Advertisement>], p: &Palette, width: usize) -> String {
    let mut out = String::new();
    for entry in entries {
        let line = match entry {
            FeedEntry::Post(post) => post_line(post, p, width),
            FeedEntry::Ad(ad) => ad_line(ad, p, width),
        };
        writeln!(out, "{line}").unwrap();
    }
    out
}

pub fn section(title: &str, p: &Palette) -> String {
    format!("{}=== {title} ==={}", p.bold, p.reset)
}

/// Inline notice for a section whose data could not be fetched.
pub fn unavailable(what: &str, p: &Palette) -> String {
    format!("{}could not load {what}{}", p.error, p.reset)
}

pub fn comment(comment: &Comment, p: &Palette) -> String {
    format!(
        "{}{}{} {}{}{}\n  {}",
        p.bold,
        comment.author_name(),
        p.reset,
        p.dim,
        format_date(&comment.created_at),
        p.reset,
        comment.content.trim()
    )
}

/// Posts grouped under `=== draft ===` / `=== published ===` headings.
pub fn by_status(posts: &[Post], p: &Palette, width: usize) -> String {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| {
        a.status
            .as_str()
            .cmp(b.status.as_str())
            .then(b.created_at.cmp(&a.created_at))
    });

    let mut out = String::new();
    for (status, group) in &sorted.iter().chunk_by(|post| post.status) {
        writeln!(out, "{}", section(status.as_str(), p)).unwrap();
        for post in group {
            writeln!(out, "  {}", post_line(post, p, width.saturating_sub(2))).unwrap();
        }
        writeln!(out).unwrap();
    }
    out
}

/// Rough plain-text rendering of stored post HTML for the terminal.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let raw = &rest[start + 1..start + end];
        let closing = raw.starts_with('/');
        let tag = raw
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match (tag.as_str(), closing) {
            ("br", _) | ("li", true) => out.push('\n'),
            ("p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "pre" | "ul"
            | "ol", true) => out.push_str("\n\n"),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded
        .lines()
        .map(str::trim_end)
        .coalesce(|a, b| {
            if a.is_empty() && b.is_empty() {
                Ok(a)
            } else {
                Err((a, b))
            }
        })
        .join("\n")
        .trim()
        .to_string()
}
