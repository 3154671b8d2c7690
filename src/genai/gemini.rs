use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{GenerationError, Generator, Role, Turn};

/// Client of the Gemini REST API (`generateContent` and Imagen `predict`).
#[derive(Debug, Clone)]
pub struct Gemini {
    client: Client,
    base: Url,
    api_key: String,
    text_model: String,
    image_model: String,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
    parameters: PredictParameters,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

fn user_content(text: &str) -> Content<'_> {
    Content {
        role: Some(Role::User),
        parts: vec![Part { text }],
    }
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, GenerationError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenerationError::new("empty response"));
        }
        Ok(text)
    }
}

impl Gemini {
    pub fn new(
        client: Client,
        base: &str,
        api_key: &str,
        text_model: &str,
        image_model: &str,
    ) -> Result<Self, GenerationError> {
        let mut base = Url::parse(base.trim()).map_err(GenerationError::new)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            api_key: api_key.to_string(),
            text_model: text_model.to_string(),
            image_model: image_model.to_string(),
        })
    }

    fn call<B: Serialize, R: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> Result<R, GenerationError> {
        let url = self
            .base
            .join(&format!("v1beta/models/{model}:{method}"))
            .map_err(GenerationError::new)?;
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::new(format!("{status}: {}", body.trim())));
        }
        let raw = response.text()?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, GenerationError> {
        let response: GenerateResponse = self.call(&self.text_model, "generateContent", request)?;
        response.into_text()
    }
}

impl Generator for Gemini {
    fn text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate(&GenerateRequest {
            contents: vec![user_content(prompt)],
            system_instruction: None,
            generation_config: None,
        })
    }

    fn json(&self, prompt: &str, schema: &Value) -> Result<Value, GenerationError> {
        let text = self.generate(&GenerateRequest {
            contents: vec![user_content(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        })?;
        Ok(serde_json::from_str(text.trim())?)
    }

    fn image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let request = PredictRequest {
            instances: vec![Instance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
                output_options: OutputOptions {
                    mime_type: "image/jpeg",
                },
            },
        };
        let response: PredictResponse = self.call(&self.image_model, "predict", &request)?;
        let encoded = response
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64_encoded)
            .ok_or_else(|| GenerationError::new("no image returned"))?;
        Ok(STANDARD.decode(encoded)?)
    }

    fn chat(&self, system: &str, history: &[Turn]) -> Result<String, GenerationError> {
        let contents = history
            .iter()
            .map(|turn| Content {
                role: Some(turn.role),
                parts: vec![Part { text: &turn.text }],
            })
            .collect();
        self.generate(&GenerateRequest {
            contents,
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: system }],
            }),
            generation_config: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_mode_request_shape() {
        let schema = json!({"type": "OBJECT"});
        let request = GenerateRequest {
            contents: vec![user_content("hi")],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
            }),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"},
                },
            })
        );
    }

    #[test]
    fn test_reply_parts_are_concatenated() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello, "}, {"text": "world"}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello, world");
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn test_predict_request_shape() {
        let request = PredictRequest {
            instances: vec![Instance { prompt: "a cat" }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
                output_options: OutputOptions {
                    mime_type: "image/jpeg",
                },
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "instances": [{"prompt": "a cat"}],
                "parameters": {
                    "sampleCount": 1,
                    "aspectRatio": "16:9",
                    "outputOptions": {"mimeType": "image/jpeg"},
                },
            })
        );
    }
}
