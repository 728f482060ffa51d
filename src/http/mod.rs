/// HTTP surface of the habit tracker
///
/// Thin routing over the service layer: handlers deserialize requests,
/// call a service operation, and serialize the result. Error mapping
/// lives in `error`, habit endpoints in `habits`, AI endpoints in `ai`.

pub mod ai;
pub mod error;
pub mod habits;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::provider::TextGenerator;
use crate::storage::SqliteStore;

/// Shared state handed to every request handler
pub struct AppState {
    pub store: SqliteStore,
    /// Absent when no provider API key is configured; AI endpoints then
    /// answer 503 (suggest) or the fixed fallback (chat)
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub fn new(store: SqliteStore, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { store, generator }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the CORS layer from the configured allowed origins
///
/// An empty list means a permissive policy (the development default of
/// the original deployment).
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
}

/// Assemble the application router
pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/habits", get(habits::list).post(habits::create))
        .route("/habits/:id/toggle", post(habits::toggle))
        .route("/habits/:id", delete(habits::remove))
        .route("/ai/suggest", post(ai::suggest))
        .route("/ai/chat", post(ai::chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
