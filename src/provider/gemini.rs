/// Gemini REST API client
///
/// Thin wrapper over the `models/{model}:generateContent` endpoint. The
/// HTTP client carries an explicit timeout so a stalled provider cannot
/// hold a request open indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::{ChatTurn, ProviderError, Role, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini text-generation REST API
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client for the given model with an explicit call timeout
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        })
    }

    /// Override the API base URL (used for tests against a local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn to_content(turn: &ChatTurn) -> Content {
    // Gemini names the assistant role "model"
    let role = match turn.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: turn.content.clone(),
        }],
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[ChatTurn],
    ) -> Result<String, ProviderError> {
        // The key travels in a header, never in the URL: transport errors
        // echo the full URL into their Display text, which can reach logs
        // and 500 response bodies.
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateRequest {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
            contents: turns.iter().map(to_content).collect(),
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response.json().await?;

        let text: String = payload
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

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        tracing::debug!("Provider returned {} characters", text.len());
        Ok(text)
    }
}
