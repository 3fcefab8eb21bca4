//! Webhook endpoint handlers.
//!
//! Each delivery runs through three stages in order:
//! 1. Classify: POST with a JSON body, or a terminal response
//! 2. Verify the `X-Hub-Signature` over the raw body
//! 3. Ingest: filter the event and write one record to the store
//!
//! Failures from any stage surface as a [`WebhookError`] and are turned into a
//! response here. Panics are caught by the router and reported as 500.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::error::WebhookError;
use crate::ingest::{ingest, IngestOutcome, WebhookPayload};
use crate::kv::KvStore;
use crate::web::classifier::classify;
use crate::web::request::InboundRequest;
use crate::web::signature::{check_signature, SignatureCheck, SIGNATURE_HEADER};
use crate::config::{Config, HEALTH_PATH};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KvStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KvStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let webhook_path = state.config.webhook_path.clone();

    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(&webhook_path, any(artifact_webhook))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Artifact Webhook
// =============================================================================

impl IntoResponse for IngestOutcome {
    fn into_response(self) -> Response {
        match self {
            IngestOutcome::Ignored { .. } => (StatusCode::OK, "Event ignored").into_response(),
            IngestOutcome::Stored { key } => (
                StatusCode::OK,
                format!("Successfully updated key: {}", key),
            )
                .into_response(),
        }
    }
}

/// Artifact webhook endpoint.
///
/// Accepts every method so that non-POST requests get the instructional 405
/// body rather than an empty one.
pub async fn artifact_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let request = InboundRequest::read(method, headers, body, state.config.max_body_bytes).await;

    info!(
        method = %request.method(),
        body_length = request.body().len(),
        has_signature = request.header(SIGNATURE_HEADER).is_some(),
        "artifact_webhook_received"
    );

    match process_request(&state, &request).await {
        Ok(outcome) => outcome.into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                error!(status = status.as_u16(), error = %err, "artifact_webhook_failed");
            } else {
                warn!(status = status.as_u16(), error = %err, "artifact_webhook_rejected");
            }
            err.into_response()
        }
    }
}

/// Run one delivery through classification, verification and ingestion.
pub async fn process_request(
    state: &AppState,
    request: &InboundRequest,
) -> Result<IngestOutcome, WebhookError> {
    let document = classify(request)?;

    let header = request.header(SIGNATURE_HEADER).map(HeaderValue::as_bytes);
    match check_signature(
        request.body(),
        header,
        state.config.webhook_secret.as_bytes(),
    ) {
        SignatureCheck::Valid => {}
        SignatureCheck::Missing => return Err(WebhookError::MissingSignature),
        _ => return Err(WebhookError::InvalidSignature),
    }

    ingest(state.store.as_ref(), WebhookPayload::from_document(document)).await
}

/// Render a panic caught by [`CatchPanicLayer`].
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(detail = %detail, "artifact_webhook_panicked");
    WebhookError::Internal(detail).into_response()
}
