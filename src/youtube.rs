use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("invalid YouTube link: {0}")]
    InvalidLink(String),
    #[error("invalid transcript service address: {0}")]
    Url(#[from] url::ParseError),
    #[error("transcript request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("transcript service answered {0}; the video may have no transcript")]
    Status(StatusCode),
    #[error("no transcript available for video {0}")]
    Unavailable(String),
}

/// Extract the 11-character video id from the usual YouTube link shapes.
pub fn video_id(link: &str) -> Option<String> {
    let link = link.trim();
    let url = Url::parse(link)
        .or_else(|_| Url::parse(&format!("https://{link}")))
        .ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = host.strip_prefix("m.").unwrap_or(host);
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let candidate = match host {
        "youtu.be" => segments.first().map(|s| s.to_string()),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
            [] | ["watch", ..] => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            ["embed" | "v" | "shorts" | "live", id, ..] => Some(id.to_string()),
            ["u", _, id, ..] => Some(id.to_string()),
            _ => None,
        },
        _ => None,
    }?;
    is_video_id(&candidate).then_some(candidate)
}

fn is_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcripts: Vec<VideoTranscript>,
}

#[derive(Deserialize)]
struct VideoTranscript {
    #[serde(default)]
    status: String,
    #[serde(default)]
    transcript: Vec<Segment>,
}

#[derive(Deserialize)]
struct Segment {
    text: String,
}

impl TranscriptResponse {
    fn into_text(self) -> Option<String> {
        let first = self.transcripts.into_iter().next()?;
        if first.status != "completed" || first.transcript.is_empty() {
            return None;
        }
        let text = first
            .transcript
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }
}

pub struct TranscriptClient {
    client: Client,
    base: String,
    key: Option<String>,
}

impl TranscriptClient {
    pub fn new(client: Client, base: &str, key: Option<&str>) -> Self {
        Self {
            client,
            base: base.trim().trim_end_matches('/').to_string(),
            key: key.map(str::to_string),
        }
    }

    pub fn fetch(&self, link: &str) -> Result<String, TranscriptError> {
        let id = video_id(link).ok_or_else(|| TranscriptError::InvalidLink(link.to_string()))?;
        let url = Url::parse(&format!("{}/api/transcripts", self.base))?;
        debug!("POST {url} for video {id}");
        let mut request = self.client.post(url).json(&json!({ "ids": [id] }));
        if let Some(key) = &self.key {
            request = request.header("Authorization", format!("Basic {key}"));
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(TranscriptError::Status(response.status()));
        }
        let body: TranscriptResponse = response.json()?;
        body.into_text().ok_or(TranscriptError::Unavailable(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42")]
    #[case("https://m.youtube.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ?t=10")]
    #[case("youtu.be/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/embed/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/v/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/shorts/dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/u/w/dQw4w9WgXcQ")]
    #[case("  https://www.youtube.com/watch?v=dQw4w9WgXcQ#comments ")]
    fn test_video_id_shapes(#[case] link: &str) {
        assert_eq!(video_id(link).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[rstest]
    #[case("")]
    #[case("not a link")]
    #[case("https://www.youtube.com/watch?v=short")]
    #[case("https://www.youtube.com/channel/UCabcdefghij")]
    #[case("https://vimeo.com/123456789")]
    #[case("https://youtu.be/")]
    fn test_video_id_rejects(#[case] link: &str) {
        assert_eq!(video_id(link), None);
    }

    #[test]
    fn test_completed_transcript_segments_are_joined() {
        let response: TranscriptResponse = serde_json::from_value(json!({
            "transcripts": [{
                "status": "completed",
                "transcript": [{"text": "Hello"}, {"text": " world "}, {"text": ""}],
            }]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_pending_transcript_is_unavailable() {
        let response: TranscriptResponse = serde_json::from_value(json!({
            "transcripts": [{"status": "processing"}]
        }))
        .unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn test_invalid_link_fails_before_any_request() {
        let client = TranscriptClient::new(Client::new(), "http://127.0.0.1:9", None);
        assert!(matches!(
            client.fetch("https://example.com/video"),
            Err(TranscriptError::InvalidLink(_))
        ));
    }
}
