//! Integration tests for the descriptor HTTP API, driven through the axum
//! router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fieldform_core::{ContactPolicy, FormError, FormResult, Settings};
use fieldform_server::{router, AppState, FieldformApp};
use fieldform_store::{
    seed_fields, FieldDescriptor, FieldStore, FieldType, FieldValue, InMemoryFieldStore,
    JsonFileStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn app(store: &InMemoryFieldStore) -> axum::Router {
    router(AppState::new(Arc::new(store.clone())))
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_json(app: axum::Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, method, uri, Body::from(body.to_string())).await
}

/// A store that is always unreachable.
struct DownStore;

#[async_trait]
impl FieldStore for DownStore {
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>> {
        Err(FormError::Fetch("connection refused".into()))
    }

    async fn replace(&self, _fields: Vec<FieldDescriptor>) -> FormResult<()> {
        Err(FormError::Submit("connection refused".into()))
    }
}

// ═════════════════════════════════════════════════════════════════════
// 1. Listing and replacing
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_get_returns_descriptor_list() {
    let store = InMemoryFieldStore::seeded();
    let (status, body) = send(app(&store), "GET", "/api/form-fields", Body::empty()).await;

    assert_eq!(status, StatusCode::OK);
    let fields: Vec<FieldDescriptor> = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(fields, seed_fields());
    assert_eq!(body[0]["rowIndex"], json!(0));
    assert_eq!(body[1]["type"], json!("email"));
}

#[tokio::test]
async fn test_put_replaces_list() {
    let store = InMemoryFieldStore::seeded();
    let payload = json!([
        { "name": "bio", "type": "text", "label": "Bio", "value": "hello" },
        { "name": "age", "type": "number", "value": 42 }
    ]);

    let (status, body) = send_json(app(&store), "PUT", "/api/form-fields", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let saved = store.snapshot().await;
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].name, "bio");
    assert_eq!(saved[1].field_type, FieldType::Number);
    assert_eq!(saved[1].value, Some(FieldValue::Int(42)));
}

#[tokio::test]
async fn test_post_also_replaces_list() {
    let store = InMemoryFieldStore::seeded();
    let payload = json!([{ "name": "only", "type": "tel" }]);

    let (status, _) = send_json(app(&store), "POST", "/api/form-fields", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.snapshot().await.len(), 1);
    assert_eq!(store.replace_count(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let store = InMemoryFieldStore::seeded();
    let (status, body) = send(
        app(&store),
        "PUT",
        "/api/form-fields",
        Body::from("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Serialization error"));
    assert_eq!(store.replace_count(), 0);
    assert_eq!(store.snapshot().await, seed_fields());
}

#[tokio::test]
async fn test_unknown_type_round_trips() {
    let store = InMemoryFieldStore::new(Vec::new());
    let payload = json!([{ "name": "site", "type": "url", "variant": "fancy" }]);
    send_json(app(&store), "PUT", "/api/form-fields", &payload).await;

    let (_, body) = send(app(&store), "GET", "/api/form-fields", Body::empty()).await;
    assert_eq!(body[0]["type"], json!("url"));
    assert_eq!(body[0]["variant"], json!("fancy"));
}

// ═════════════════════════════════════════════════════════════════════
// 2. Validation endpoint
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_validate_reports_field_errors() {
    let store = InMemoryFieldStore::seeded();
    let payload = json!({ "values": { "email": "nope", "age": 150 } });

    let (status, body) =
        send_json(app(&store), "POST", "/api/form-fields/validate", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(false));
    assert_eq!(body["errors"]["email"], json!(["Invalid email address"]));
    assert_eq!(
        body["errors"]["age"],
        json!(["Age must be between 1 and 120"])
    );
    assert!(body["visible"]
        .as_array()
        .unwrap()
        .contains(&json!("contact")));
}

#[tokio::test]
async fn test_validate_when_visible_accepts_minor() {
    let store = InMemoryFieldStore::seeded();
    let state = AppState::new(Arc::new(store.clone())).contact_policy(ContactPolicy::WhenVisible);
    let payload = json!({ "values": { "email": "user@example.com", "age": "17" } });

    let (status, body) =
        send_json(router(state), "POST", "/api/form-fields/validate", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["errors"], json!({}));
    assert!(!body["visible"]
        .as_array()
        .unwrap()
        .contains(&json!("contact")));
}

#[tokio::test]
async fn test_validate_always_requires_contact() {
    let store = InMemoryFieldStore::seeded();
    let payload = json!({ "values": { "email": "user@example.com" } });

    let (_, body) = send_json(app(&store), "POST", "/api/form-fields/validate", &payload).await;
    assert_eq!(body["valid"], json!(false));
    assert_eq!(
        body["errors"]["contact"],
        json!(["Please enter a valid email or phone number"])
    );
}

#[tokio::test]
async fn test_validate_empty_body_uses_defaults() {
    let store = InMemoryFieldStore::seeded();
    let (status, body) = send(
        app(&store),
        "POST",
        "/api/form-fields/validate",
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"]["email"], json!(["Email is required"]));
    assert!(body["errors"].get("username").is_none());
}

// ═════════════════════════════════════════════════════════════════════
// 3. Failures and routing
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_unreachable_store_maps_statuses() {
    let state = AppState::new(Arc::new(DownStore));

    let (status, body) = send(router(state.clone()), "GET", "/api/form-fields", Body::empty()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    let (status, _) = send_json(router(state), "PUT", "/api/form-fields", &json!([])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let store = InMemoryFieldStore::seeded();
    let (status, _) = send(app(&store), "GET", "/api/nothing", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_app_over_file_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    let settings = Settings {
        data_file: Some(path.clone()),
        ..Settings::default()
    };
    let router = FieldformApp::new(settings).into_axum_router().await.unwrap();

    let payload = json!([{ "name": "nickname", "type": "text" }]);
    let (status, _) = send_json(router.clone(), "PUT", "/api/form-fields", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(router, "GET", "/api/form-fields", Body::empty()).await;
    assert_eq!(body[0]["name"], json!("nickname"));

    let reopened = JsonFileStore::new(path.clone()).fetch().await.unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened[0].name, "nickname");
}
