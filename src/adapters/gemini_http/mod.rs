//! Gemini selection adapter
//!
//! Talks to the `models/{model}:generateContent` endpoint of the Google
//! generative language API. The client is built once with a hard timeout and
//! reused for every call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::toml_config::AiConfig;
use crate::domain::errors::DomainError;
use crate::ports::SelectionPort;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first answer, parts concatenated
    fn answer_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Gemini-backed AI collaborator
pub struct GeminiAdapter {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAdapter {
    /// Create adapter reading the API key from the configured variable
    pub fn new(config: &AiConfig) -> Result<Self, DomainError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            DomainError::BadArgs(format!(
                "Environment variable {} must hold the AI collaborator API key",
                config.api_key_env
            ))
        })?;
        Self::with_api_key(config, api_key)
    }

    /// Create adapter with an explicit API key
    pub fn with_api_key(config: &AiConfig, api_key: String) -> Result<Self, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::BadArgs("API key cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl SelectionPort for GeminiAdapter {
    async fn complete(&self, request: &str) -> Result<String, DomainError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: request }],
            }],
        };

        debug!(model = %self.model, prompt_chars = request.len(), "Sending selection request");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Timeout(format!("{} did not answer: {}", self.model, e))
                } else {
                    DomainError::CollaboratorUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::CollaboratorUnavailable(format!(
                "{} returned {}: {}",
                self.model,
                status,
                detail.chars().take(300).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::CollaboratorUnavailable(format!("Unreadable response body: {}", e))
        })?;

        Ok(parsed.answer_text().trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}
