/// Integration tests driving the HTTP surface end to end
///
/// Each test assembles the router over a fresh in-memory store (and,
/// where AI endpoints are involved, a scripted provider) and issues
/// requests through tower's oneshot.
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use habit_tracker_api::http;
use habit_tracker_api::service::suggestions;
use habit_tracker_api::{AppState, ChatTurn, ProviderError, SqliteStore, TextGenerator};

/// Scripted provider stand-in
struct ScriptedGenerator {
    reply: Option<String>,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _system: Option<&str>,
        _turns: &[ChatTurn],
    ) -> Result<String, ProviderError> {
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::EmptyResponse),
        }
    }
}

fn app() -> Router {
    app_with_generator(None)
}

fn app_replying(text: &str) -> Router {
    app_with_generator(Some(Arc::new(ScriptedGenerator {
        reply: Some(text.to_string()),
    })))
}

fn app_with_failing_provider() -> Router {
    app_with_generator(Some(Arc::new(ScriptedGenerator { reply: None })))
}

fn app_with_generator(generator: Option<Arc<dyn TextGenerator>>) -> Router {
    let store = SqliteStore::in_memory().expect("Failed to open in-memory store");
    http::router(Arc::new(AppState::new(store, generator)), &[])
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

async fn create_habit(app: &Router, name: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/habits", json!({ "name": name })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(bare_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_list_habits() {
    let app = app();

    let created = create_habit(&app, "Morning run").await;
    assert_eq!(created["name"], "Morning run");
    assert_eq!(created["is_active"], true);
    assert_eq!(created["logs"], json!([]));
    assert!(created["id"].is_string());

    let response = app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_create_with_empty_name_is_bad_request() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/habits", json!({ "name": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listed = body_json(app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_toggle_is_an_involution() {
    let app = app();
    let created = create_habit(&app, "Read").await;
    let uri = format!("/habits/{}/toggle", created["id"].as_str().unwrap());

    let first = app
        .clone()
        .oneshot(json_request("POST", &uri, json!({ "date": "2026-06-01" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
    assert_eq!(body["logs"][0]["completed_date"], "2026-06-01");

    let second = app
        .clone()
        .oneshot(json_request("POST", &uri, json!({ "date": "2026-06-01" })))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let body = body_json(second).await;
    assert_eq!(body["logs"], json!([]));
}

#[tokio::test]
async fn test_toggle_distinct_dates_returns_ascending_logs() {
    let app = app();
    let created = create_habit(&app, "Stretch").await;
    let uri = format!("/habits/{}/toggle", created["id"].as_str().unwrap());

    let mut last = Value::Null;
    for date in ["2026-06-20", "2026-06-03", "2026-06-11"] {
        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({ "date": date })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
    }

    let dates: Vec<&str> = last["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["completed_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-06-03", "2026-06-11", "2026-06-20"]);
}

#[tokio::test]
async fn test_toggle_without_body_uses_today() {
    let app = app();
    let created = create_habit(&app, "Walk").await;
    let uri = format!("/habits/{}/toggle", created["id"].as_str().unwrap());

    let response = app.clone().oneshot(bare_request("POST", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let today = chrono::Utc::now().date_naive().to_string();
    assert_eq!(body["logs"][0]["completed_date"], today);
}

#[tokio::test]
async fn test_toggle_with_malformed_date_is_bad_request() {
    let app = app();
    let created = create_habit(&app, "Stretch").await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/habits/{}/toggle", id);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, json!({ "date": "garbage" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The bad request must not have toggled any date behind the caller's back
    let response = app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap();
    let body = body_json(response).await;
    let habit = body
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["id"] == id.as_str())
        .unwrap();
    assert_eq!(habit["logs"], json!([]));
}

#[tokio::test]
async fn test_toggle_unknown_habit_is_not_found() {
    let app = app();

    let uri = format!("/habits/{}/toggle", uuid::Uuid::new_v4());
    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unparseable identifiers cannot name an existing habit either
    let response = app
        .clone()
        .oneshot(json_request("POST", "/habits/42/toggle", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_habit_from_listings() {
    let app = app();
    let created = create_habit(&app, "Swim").await;
    let id = created["id"].as_str().unwrap().to_string();

    // Give it a completion first so the cascade is exercised
    let toggle_uri = format!("/habits/{}/toggle", id);
    app.clone()
        .oneshot(json_request("POST", &toggle_uri, json!({ "date": "2026-06-01" })))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/habits/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed = body_json(app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap()).await;
    assert_eq!(listed, json!([]));

    // A second delete reports not found; there is no resurrection path
    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/habits/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_suggest_without_provider_is_unavailable() {
    let response = app()
        .oneshot(json_request("POST", "/ai/suggest", json!({ "goal": "get fit" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_suggest_missing_goal_is_bad_request() {
    let response = app_replying("{}")
        .oneshot(json_request("POST", "/ai/suggest", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suggest_extracts_fenced_reply() {
    let app = app_replying("Here:\n```json\n{\"habits\":[\"Drink water\",\"Walk 10 min\"]}\n```");

    let response = app
        .oneshot(json_request("POST", "/ai/suggest", json!({ "goal": "get fit" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({ "habits": ["Drink water", "Walk 10 min"] }));
}

#[tokio::test]
async fn test_suggest_unparseable_reply_falls_back_softly() {
    let app = app_replying("not json at all");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/ai/suggest", json!({ "goal": "get fit" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let habits = body["habits"].as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0], suggestions::bad_format_fallback_text());

    // The soft fallback must not persist anything
    let listed = body_json(app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_suggest_auto_create_persists_habits() {
    let app = app_replying(r#"{"habits":["Drink water","Walk 10 min"]}"#);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/ai/suggest",
            json!({ "goal": "get fit", "auto_create": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["created_habits"].as_array().unwrap().len(), 2);

    let listed = body_json(app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap()).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_suggest_auto_create_unparseable_reply_is_bad_request() {
    let app = app_replying("not json at all");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/ai/suggest",
            json!({ "goal": "get fit", "auto_create": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listed = body_json(app.clone().oneshot(bare_request("GET", "/habits")).await.unwrap()).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_chat_returns_provider_reply() {
    let app = app_replying("Keep going!");

    let response = app
        .oneshot(json_request(
            "POST",
            "/ai/chat",
            json!({ "messages": [{ "role": "user", "content": "motivate me" }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"], "Keep going!");
}

#[tokio::test]
async fn test_chat_never_errors_when_provider_fails() {
    let app = app_with_failing_provider();

    let response = app
        .oneshot(json_request(
            "POST",
            "/ai/chat",
            json!({ "messages": [{ "role": "user", "content": "hello" }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"], suggestions::chat_fallback_text());
}
