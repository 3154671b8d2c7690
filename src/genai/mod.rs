mod authoring;
mod gemini;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use authoring::{
    Conversation, suggest_seo, summarize, thumbnail, transcript_to_post, write_article,
};
pub use gemini::Gemini;

/// Any failure of a generation call. No partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("generation failed: {0}")]
pub struct GenerationError(String);

impl GenerationError {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e)
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("malformed response: {e}"))
    }
}

impl From<base64::DecodeError> for GenerationError {
    fn from(e: base64::DecodeError) -> Self {
        Self::new(format!("malformed image data: {e}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A hosted text and image generation service.
pub trait Generator {
    fn text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Text constrained to `schema`, parsed as JSON.
    fn json(&self, prompt: &str, schema: &Value) -> Result<Value, GenerationError>;

    /// Raw bytes of one generated image.
    fn image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError>;

    /// Next model reply given the whole conversation so far.
    fn chat(&self, system: &str, history: &[Turn]) -> Result<String, GenerationError>;
}
