//! Gemini Provider Implementation
//!
//! Response provider for a generateContent-style REST endpoint.
//!
//! # Wire contract
//!
//! `POST {base_url}/models/{model}:generateContent?key={api_key}` with
//!
//! ```text
//! system_instruction.parts[0].text = persona
//! contents = [ user: persona ]        (only with repeat_persona)
//!          + [ user|model: turn ]...  (prior turns, in order)
//!          + [ user: new message ]
//! ```
//!
//! The reply is `candidates[0].content.parts[0].text`. Anything else is a
//! `ProviderError`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{ProviderConfig, ProviderError, ProviderRequest, ResponseProvider};

/// Error bodies are cut to this many bytes before they reach logs/errors
const MAX_ERROR_BODY: usize = 512;

/// Gemini provider client
#[derive(Clone)]
pub struct GeminiProvider {
    /// Connection settings
    config: ProviderConfig,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new provider
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            config,
            http_client,
        }
    }

    /// Connection settings
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Get generateContent endpoint URL (without the key)
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON body for `request`
    fn build_body<'a>(&self, request: &'a ProviderRequest) -> GenerateContentRequest<'a> {
        let mut contents = Vec::with_capacity(request.history.len() + 2);

        if self.config.repeat_persona {
            contents.push(Content::text("user", &request.persona));
        }

        contents.extend(
            request
                .history
                .iter()
                .map(|turn| Content::text(turn.sender().provider_role(), turn.text())),
        );

        contents.push(Content::text("user", &request.message));

        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: &request.persona,
                }],
            },
            contents,
        }
    }
}

#[async_trait]
impl ResponseProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(ProviderError::Unavailable("no API key configured".into())),
        };

        let start = Instant::now();
        let body = self.build_body(request);

        let response = self
            .http_client
            .post(self.generate_url())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        let reply = parse_reply(&text)?;

        tracing::debug!(
            model = %self.config.model,
            history = request.history.len(),
            reply_bytes = reply.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Provider replied"
        );

        Ok(reply)
    }
}

/// Extract `candidates[0].content.parts[0].text` from a response body
fn parse_reply(body: &str) -> Result<String, ProviderError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(ProviderError::NoCandidate)
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(role: &'static str, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::conversation::Turn;

    fn provider(repeat_persona: bool) -> GeminiProvider {
        GeminiProvider::new(ProviderConfig {
            api_key: Some("test-key".to_string()),
            repeat_persona,
            ..Default::default()
        })
    }

    #[test]
    fn test_generate_url() {
        let backend = GeminiProvider::new(ProviderConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..Default::default()
        });
        assert_eq!(
            backend.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_build_body_maps_roles_in_order() {
        let history = vec![Turn::assistant("greeting"), Turn::user("hi"), Turn::assistant("hey")];
        let request = ProviderRequest::new("PERSONA", "what do you build?").with_history(&history);

        let body = serde_json::to_value(provider(true).build_body(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "system_instruction": { "parts": [{ "text": "PERSONA" }] },
                "contents": [
                    { "role": "user",  "parts": [{ "text": "PERSONA" }] },
                    { "role": "model", "parts": [{ "text": "greeting" }] },
                    { "role": "user",  "parts": [{ "text": "hi" }] },
                    { "role": "model", "parts": [{ "text": "hey" }] },
                    { "role": "user",  "parts": [{ "text": "what do you build?" }] }
                ]
            })
        );
    }

    #[test]
    fn test_build_body_without_repeated_persona() {
        let request = ProviderRequest::new("PERSONA", "hello");
        let body = serde_json::to_value(provider(false).build_body(&request)).unwrap();

        assert_eq!(
            body["contents"],
            json!([{ "role": "user", "parts": [{ "text": "hello" }] }])
        );
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "PERSONA");
    }

    #[test]
    fn test_parse_reply_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"first"},{"text":"second part"}]}},
            {"content":{"parts":[{"text":"other candidate"}]}}
        ]}"#;
        assert_eq!(parse_reply(body), Ok("first".to_string()));
    }

    #[test]
    fn test_parse_reply_failures() {
        assert_eq!(parse_reply(r#"{"candidates":[]}"#), Err(ProviderError::NoCandidate));
        assert_eq!(parse_reply("{}"), Err(ProviderError::NoCandidate));
        assert_eq!(
            parse_reply(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(ProviderError::NoCandidate)
        );
        assert_eq!(
            parse_reply(r#"{"candidates":[{"content":{"parts":[]}}]}"#),
            Err(ProviderError::NoCandidate)
        );
        assert!(matches!(
            parse_reply("<html>502 Bad Gateway</html>"),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let backend = GeminiProvider::new(ProviderConfig::default());
        let result = backend.generate(&ProviderRequest::new("p", "hi")).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }
}
