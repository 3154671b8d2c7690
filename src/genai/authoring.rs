//! Prompts and typed results of the authoring assists.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{GenerationError, Generator, Turn};

const CONTENT_LIMIT: usize = 4000;
const TRANSCRIPT_LIMIT: usize = 8000;

const ASSISTANT_INSTRUCTION: &str = "You are a helpful assistant for the administrator of a blog. \
Help them create, edit, improve and manage blog posts: suggest catchy titles, write paragraphs \
on a given topic, improve existing text, check grammar and spelling, and propose ideas for new \
posts. Use markdown when it helps. Be concise and professional.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub meta_description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSuggestions {
    pub seo_title: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptPost {
    pub title: String,
    pub content: String,
}

/// The first `max_chars` characters of `text`.
fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn structured<G, T>(generator: &G, prompt: &str, schema: &Value) -> Result<T, GenerationError>
where
    G: Generator + ?Sized,
    T: DeserializeOwned,
{
    let value = generator.json(prompt, schema)?;
    Ok(serde_json::from_value(value)?)
}

pub fn write_article<G: Generator + ?Sized>(
    generator: &G,
    topic: &str,
) -> Result<ArticleDraft, GenerationError> {
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A catchy, search-friendly title for the post.",
            },
            "content": {
                "type": "STRING",
                "description": "The full post in well-structured markdown, at least 500 words.",
            },
            "keywords": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "Three to five relevant SEO keywords.",
            },
            "meta_description": {
                "type": "STRING",
                "description": "A compelling meta description under 160 characters.",
            },
        },
        "required": ["title", "content", "keywords", "meta_description"],
    });
    let prompt = format!(
        "Write a comprehensive, well-structured and engaging blog post about \"{topic}\". \
         Keep the tone informative and professional. Answer in JSON."
    );
    structured(generator, &prompt, &schema)
}

pub fn suggest_seo<G: Generator + ?Sized>(
    generator: &G,
    content: &str,
) -> Result<SeoSuggestions, GenerationError> {
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "seoTitle": {"type": "STRING"},
            "metaDescription": {"type": "STRING"},
            "keywords": {"type": "ARRAY", "items": {"type": "STRING"}},
        },
        "required": ["seoTitle", "metaDescription", "keywords"],
    });
    let prompt = format!(
        "Suggest SEO metadata for the article below: a title of at most 60 characters, \
         a meta description of at most 160 characters and five relevant keywords. \
         Answer with a JSON object with the keys \"seoTitle\", \"metaDescription\" and \"keywords\".\n\n\
         Article: \"{}\"",
        clip(content, CONTENT_LIMIT)
    );
    structured(generator, &prompt, &schema)
}

pub fn summarize<G: Generator + ?Sized>(
    generator: &G,
    content: &str,
) -> Result<String, GenerationError> {
    let prompt = format!(
        "Summarize the article below in two or three short bullet points that are easy to read.\n\n\
         Article: \"{}\"",
        clip(content, CONTENT_LIMIT)
    );
    Ok(generator.text(&prompt)?.trim().to_string())
}

pub fn thumbnail_prompt(title: &str) -> String {
    format!(
        "A vibrant and artistic blog post thumbnail for an article about: \"{title}\". \
         Digital art style, eye-catching, no text."
    )
}

pub fn thumbnail<G: Generator + ?Sized>(
    generator: &G,
    title: &str,
) -> Result<Vec<u8>, GenerationError> {
    generator.image(&thumbnail_prompt(title))
}

/// Turn a video transcript into a bilingual (English and Tamil) post.
pub fn transcript_to_post<G: Generator + ?Sized>(
    generator: &G,
    transcript: &str,
) -> Result<TranscriptPost, GenerationError> {
    let prompt = format!(
        "You are an expert content creator. Below is the raw transcript of a YouTube video.\n\
         1. Read and understand the whole transcript.\n\
         2. Write a concise summary of its key points and main ideas.\n\
         3. Translate that summary accurately into Tamil.\n\
         4. Format the result as a complete blog post in Markdown.\n\
         5. Put the title on the first line, in English and Tamil, like 'English Title | தமிழ் தலைப்பு'.\n\
         6. In the body, give the English summary first and then the Tamil translation, \
            each under its own heading (### English Summary, ### தமிழ் சுருக்கம்).\n\
         7. Keep the tone informative and engaging.\n\n\
         Transcript:\n---\n{}\n---\n",
        clip(transcript, TRANSCRIPT_LIMIT)
    );
    Ok(split_title(&generator.text(&prompt)?))
}

/// First line (without heading markers) is the title, the rest is the body.
pub fn split_title(text: &str) -> TranscriptPost {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    TranscriptPost {
        title: first.trim_start().trim_start_matches('#').trim().to_string(),
        content: rest.trim().to_string(),
    }
}

/// Running conversation with the admin assistant.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Send `message` and record the exchange. A failed call leaves the
    /// history as it was.
    pub fn send<G: Generator + ?Sized>(
        &mut self,
        generator: &G,
        message: &str,
    ) -> Result<&str, GenerationError> {
        self.history.push(Turn::user(message));
        match generator.chat(ASSISTANT_INSTRUCTION, &self.history) {
            Ok(reply) => {
                self.history.push(Turn::model(reply));
                Ok(&self.history[self.history.len() - 1].text)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::genai::Role;

    /// Replays canned answers and records every prompt it was given.
    #[derive(Default)]
    struct Canned {
        reply: Option<String>,
        json: Option<Value>,
        prompts: RefCell<Vec<String>>,
    }

    impl Canned {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                ..Self::default()
            }
        }

        fn answering(value: Value) -> Self {
            Self {
                json: Some(value),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn last_prompt(&self) -> String {
            self.prompts.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl Generator for Canned {
        fn text(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone().ok_or_else(|| GenerationError::new("offline"))
        }

        fn json(&self, prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.json.clone().ok_or_else(|| GenerationError::new("offline"))
        }

        fn image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(vec![0xff, 0xd8])
        }

        fn chat(&self, _system: &str, history: &[Turn]) -> Result<String, GenerationError> {
            let last = history.last().map(|t| t.text.clone()).unwrap_or_default();
            self.prompts.borrow_mut().push(last);
            self.reply.clone().ok_or_else(|| GenerationError::new("offline"))
        }
    }

    #[test]
    fn test_write_article_parses_schema_fields() {
        let g = Canned::answering(json!({
            "title": "Rust on the CLI",
            "content": "# Intro",
            "keywords": ["rust", "cli"],
            "meta_description": "Why Rust fits.",
        }));
        let draft = write_article(&g, "rust clis").unwrap();
        assert_eq!(draft.title, "Rust on the CLI");
        assert_eq!(draft.keywords, vec!["rust", "cli"]);
        assert!(g.last_prompt().contains("\"rust clis\""));
    }

    #[test]
    fn test_article_with_wrong_shape_is_generation_failure() {
        let g = Canned::answering(json!({"headline": "x"}));
        let err = write_article(&g, "x").unwrap_err();
        assert!(err.to_string().starts_with("generation failed"));
    }

    #[test]
    fn test_seo_uses_camel_case_keys_and_clips_input() {
        let g = Canned::answering(json!({
            "seoTitle": "T",
            "metaDescription": "D",
            "keywords": ["a", "b"],
        }));
        let long = "é".repeat(5000);
        let seo = suggest_seo(&g, &long).unwrap();
        assert_eq!(seo.seo_title, "T");
        assert_eq!(seo.meta_description, "D");
        let prompt = g.last_prompt();
        assert_eq!(prompt.matches('é').count(), CONTENT_LIMIT);
    }

    #[test]
    fn test_summarize_trims_reply() {
        let g = Canned::replying("\n- one\n- two\n");
        assert_eq!(summarize(&g, "body").unwrap(), "- one\n- two");
    }

    #[test]
    fn test_thumbnail_prompt_mentions_title() {
        let g = Canned::default();
        let bytes = thumbnail(&g, "Ferris").unwrap();
        assert_eq!(bytes, vec![0xff, 0xd8]);
        assert_eq!(g.last_prompt(), thumbnail_prompt("Ferris"));
        assert!(g.last_prompt().contains("\"Ferris\""));
    }

    #[test]
    fn test_transcript_is_clipped() {
        let g = Canned::replying("# Title | தலைப்பு\nBody");
        let transcript = "§".repeat(TRANSCRIPT_LIMIT + 100);
        let post = transcript_to_post(&g, &transcript).unwrap();
        assert_eq!(post.title, "Title | தலைப்பு");
        assert_eq!(post.content, "Body");
        assert_eq!(g.last_prompt().matches('§').count(), TRANSCRIPT_LIMIT);
    }

    #[test]
    fn test_split_title_strips_heading_markers() {
        let post = split_title("## Big News | பெரிய செய்தி\n\n### English Summary\nText\n");
        assert_eq!(post.title, "Big News | பெரிய செய்தி");
        assert_eq!(post.content, "### English Summary\nText");
    }

    #[test]
    fn test_split_title_single_line() {
        let post = split_title("Only a title");
        assert_eq!(post.title, "Only a title");
        assert_eq!(post.content, "");
    }

    #[test]
    fn test_conversation_keeps_history() {
        let g = Canned::replying("Sure!");
        let mut chat = Conversation::new();
        assert_eq!(chat.send(&g, "Suggest a title").unwrap(), "Sure!");
        assert_eq!(chat.history().len(), 2);
        assert_eq!(chat.history()[0].role, Role::User);
        assert_eq!(chat.history()[1].role, Role::Model);
    }

    #[test]
    fn test_failed_turn_is_not_recorded() {
        let g = Canned::failing();
        let mut chat = Conversation::new();
        assert!(chat.send(&g, "hello").is_err());
        assert!(chat.history().is_empty());
    }
}
