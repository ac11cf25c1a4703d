//! JSON handlers for the descriptor store.
//!
//! Request bodies are read as raw bytes and decoded with `serde_json`, so a
//! malformed body becomes a [`FormError::Serialization`] and answers 400
//! with the same `{"error": ...}` shape as every other failure.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use fieldform_core::{ContactPolicy, FormError};
use fieldform_forms::{validate_values, ValidationReport, ValueMap};
use fieldform_store::{FieldDescriptor, FieldStore};

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    /// The store the endpoints read and replace.
    pub store: Arc<dyn FieldStore>,
    /// Applied by the validate endpoint.
    pub contact_policy: ContactPolicy,
}

impl AppState {
    /// Creates state over `store` with the default contact policy.
    pub fn new(store: Arc<dyn FieldStore>) -> Self {
        Self {
            store,
            contact_policy: ContactPolicy::default(),
        }
    }

    /// Sets the contact policy the validate endpoint applies.
    #[must_use]
    pub const fn contact_policy(mut self, policy: ContactPolicy) -> Self {
        self.contact_policy = policy;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("contact_policy", &self.contact_policy)
            .finish_non_exhaustive()
    }
}

/// A [`FormError`] rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub FormError);

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self(FormError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /api/form-fields/validate`.
#[derive(Debug, Default, Deserialize)]
struct ValidateRequest {
    #[serde(default)]
    values: ValueMap,
}

/// Builds the router serving `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/form-fields",
            get(list_fields).put(replace_fields).post(replace_fields),
        )
        .route("/api/form-fields/validate", post(validate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_fields(State(state): State<AppState>) -> ApiResult<Json<Vec<FieldDescriptor>>> {
    let fields = state.store.fetch().await?;
    Ok(Json(fields))
}

async fn replace_fields(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let fields: Vec<FieldDescriptor> = serde_json::from_slice(&body)?;
    tracing::info!(count = fields.len(), "replacing descriptor list");
    state.store.replace(fields).await?;
    state.store.invalidate().await;
    Ok(Json(json!({ "success": true })))
}

async fn validate(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ValidationReport>> {
    let request: ValidateRequest = if body.is_empty() {
        ValidateRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };
    let fields = state.store.fetch().await?;
    Ok(Json(validate_values(
        &fields,
        &request.values,
        state.contact_policy,
    )))
}
