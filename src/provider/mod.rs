/// Text-generation provider integration
///
/// The provider is treated as an opaque text-completion service behind the
/// `TextGenerator` trait. The concrete implementation talks to the Gemini
/// REST API; tests substitute scripted fakes.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the external text-generation call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation sent to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for the external text-generation service
///
/// A single completion call: optional system instruction plus an ordered
/// list of conversation turns in, raw reply text out. No retries are
/// performed at this layer or above.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[ChatTurn],
    ) -> Result<String, ProviderError>;
}
