//! @ai:module:intent Text-completion contract and the Gemini HTTP client
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextCompletion, CompletionError, GeminiClient
//! @ai:module:stateless false

use crate::completion::rate_limiter::ProviderGate;
use crate::config::CompletionConfig;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// @ai:intent Failures surfaced by a completion provider
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Failed to reach completion provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Completion provider returned no text")]
    Empty,

    #[error("Completion provider unavailable: {0}")]
    Unavailable(String),
}

/// @ai:intent Opaque prompt-to-text collaborator
pub trait TextCompletion: Send + Sync {
    /// @ai:intent Generate text for a prompt
    /// @ai:effects network
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// @ai:intent Gemini `generateContent` client with shared admission control
pub struct GeminiClient {
    client: reqwest::Client,
    config: CompletionConfig,
    gate: Arc<ProviderGate>,
    api_key: String,
}

impl GeminiClient {
    /// @ai:intent Create a new Gemini client
    /// @ai:effects pure
    pub fn new(config: CompletionConfig, api_key: String) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let gate = Arc::new(ProviderGate::new(
            config.requests_per_minute,
            config.max_concurrent_requests,
        ));

        Ok(Self {
            client,
            config,
            gate,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextCompletion for GeminiClient {
    /// @ai:intent Send one prompt and join the returned text parts
    /// @ai:effects network
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let _permit = self
            .gate
            .admit()
            .await
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let started = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            response_len = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion finished"
        );

        if text.trim().is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config_for(url: &str) -> CompletionConfig {
        CompletionConfig {
            base_url: url.to_string(),
            model: "gemini-test".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_complete_joins_text_parts() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJsonString(
                r#"{"contents":[{"role":"user","parts":[{"text":"hello"}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r##"{"candidates":[{"content":{"parts":[{"text":"# 1. Project"},{"text":" Overview"}]}}]}"##,
            )
            .create_async()
            .await;

        let client = GeminiClient::new(config_for(&server.url()), "test-key".to_string()).unwrap();
        let text = client.complete("hello").await.unwrap();
        assert_eq!(text, "# 1. Project Overview");
    }

    #[tokio::test]
    async fn test_provider_error_status_surfaces() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = GeminiClient::new(config_for(&server.url()), "k".to_string()).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        match err {
            CompletionError::Provider { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("quota"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-test:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(config_for(&server.url()), "k".to_string()).unwrap();
        assert!(matches!(
            client.complete("hello").await,
            Err(CompletionError::Empty)
        ));
    }
}
