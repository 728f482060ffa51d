/// HTTP handlers for the AI suggestion and chat endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::habits::HabitResponse;
use crate::http::AppState;
use crate::provider::{ChatTurn, TextGenerator};
use crate::service::{suggestions, ServiceError};

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub goal: Option<String>,
    /// When set, every suggested name is persisted as a new habit in one
    /// all-or-nothing transaction
    #[serde(default)]
    pub auto_create: bool,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub habits: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestCreateResponse {
    pub success: bool,
    pub created_habits: Vec<HabitResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

fn require_generator(state: &AppState) -> Result<&dyn TextGenerator, ServiceError> {
    state
        .generator
        .as_deref()
        .ok_or_else(|| {
            ServiceError::Unavailable("The AI provider API key is not configured on this server".to_string())
        })
}

/// POST /ai/suggest
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SuggestRequest>,
) -> Result<Response, ApiError> {
    let generator = require_generator(state.as_ref())?;
    let goal = body.goal.unwrap_or_default();

    if body.auto_create {
        let created =
            suggestions::suggest_and_create_habits(&state.store, generator, &goal).await?;
        let response = SuggestCreateResponse {
            success: true,
            created_habits: created.into_iter().map(HabitResponse::from).collect(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    } else {
        let habits = suggestions::suggest_habits(generator, &goal).await?;
        Ok(Json(SuggestResponse { habits }).into_response())
    }
}

/// POST /ai/chat
///
/// Never returns an error status; internal failures become a fixed
/// apologetic reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = suggestions::chat(state.generator.as_deref(), &body.messages).await;
    Json(ChatResponse { response: reply })
}
