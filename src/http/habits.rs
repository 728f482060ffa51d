/// HTTP handlers for the habit lifecycle endpoints

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::AppState;
use crate::service::{habits, HabitWithLogs, ServiceError};

const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Calendar date to flip; the server's current UTC date when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub id: String,
    pub completed_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub logs: Vec<LogResponse>,
}

impl From<HabitWithLogs> for HabitResponse {
    fn from(value: HabitWithLogs) -> Self {
        Self {
            id: value.habit.id.to_string(),
            name: value.habit.name,
            description: value.habit.description,
            created_at: value.habit.created_at,
            updated_at: value.habit.updated_at,
            is_active: value.habit.is_active,
            logs: value
                .logs
                .into_iter()
                .map(|log| LogResponse {
                    id: log.id.to_string(),
                    completed_date: log.completed_on,
                })
                .collect(),
        }
    }
}

/// GET /habits
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HabitResponse>>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

    let habits = habits::list_habits(&state.store, offset, limit)?;
    Ok(Json(habits.into_iter().map(HabitResponse::from).collect()))
}

/// POST /habits
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<HabitResponse>), ApiError> {
    let created = habits::create_habit(&state.store, body.name, body.description)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Read the optional toggle body ourselves: only an absent or blank body
/// may fall back to today. A body that does not parse is a client error,
/// never a silent toggle of a date the caller did not name.
fn parse_toggle_body(body: &[u8]) -> Result<Option<NaiveDate>, ServiceError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }

    let request: ToggleRequest = serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidInput(format!("Invalid toggle body: {}", e)))?;
    Ok(request.date)
}

/// POST /habits/:id/toggle
///
/// The body is optional; `{}` or no body at all toggles today.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<HabitResponse>, ApiError> {
    let habit_id = habits::parse_habit_id(&id)?;
    let date = parse_toggle_body(&body)?;

    let refreshed = habits::toggle_habit(&state.store, &habit_id, date)?;
    Ok(Json(refreshed.into()))
}

/// DELETE /habits/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let habit_id = habits::parse_habit_id(&id)?;
    habits::delete_habit(&state.store, &habit_id)?;
    Ok(StatusCode::NO_CONTENT)
}
