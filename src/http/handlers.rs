use super::state::AppState;
use crate::error::RelayError;
use crate::meeting::MeetingPayload;
use crate::pipeline::{MeetingPipeline, PipelineReport};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, info_span, warn, Instrument};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Static service identity
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    let endpoints = [
        ("/webhook", "POST - Receives end-of-meeting webhooks"),
        ("/health", "GET - Health check"),
    ]
    .into_iter()
    .map(|(path, what)| (path.to_string(), what.to_string()))
    .collect();

    Json(ServiceInfo {
        status: "online".to_string(),
        service: state.config.service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// POST /webhook
/// Record the meeting in the workspace and notify administrators
pub async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("webhook", %request_id);

    async move {
        match process_webhook(&state, &body).await {
            Ok(report) => {
                info!(
                    "Meeting recorded on {} ({} administrators notified)",
                    report.record_id, report.notified
                );
                (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
            }
            Err(e) => {
                warn!("Webhook rejected: {}", e);
                (
                    e.status_code(),
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn process_webhook(state: &AppState, body: &[u8]) -> Result<PipelineReport, RelayError> {
    let payload = MeetingPayload::from_json(body)?;

    info!(
        session_id = payload.session_id.as_deref().unwrap_or("-"),
        "Received meeting \"{}\" owned by {}",
        payload.title(),
        payload.owner_email()
    );

    MeetingPipeline::new(&state.config, state.workspace.as_ref(), state.notifier.as_ref())
        .run(&payload)
        .await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
