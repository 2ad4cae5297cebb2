use super::state::AppState;
use crate::api::ApiError;
use crate::session::{CallSessionHandle, LiveCallSession, SessionError, SessionStatus};
use crate::store::StoreError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinWebCallRequest {
    pub call_id: String,
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebCallResponse {
    pub call_id: String,
    pub status: SessionStatus,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundCallRequest {
    pub phone_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn api_error_response(err: ApiError) -> Response {
    match err {
        ApiError::InvalidPhoneNumber => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        other => error_response(StatusCode::BAD_GATEWAY, other.to_string()),
    }
}

fn store_error_response(what: &str, err: StoreError) -> Response {
    error!("Failed to load {}: {}", what, err);
    error_response(StatusCode::BAD_GATEWAY, format!("Failed to load {}.", what))
}

/// Start a session for `handle` and register it under its call ID
///
/// The check and the insert happen under one write lock, so a call ID never
/// has two connections. Sessions that already ended or failed are released
/// and evicted first, which lets a finished call be joined again.
async fn join(state: &AppState, handle: CallSessionHandle) -> Response {
    if let Err(e) = handle.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let call_id = handle.call_id().to_string();
    let mut sessions = state.sessions.write().await;

    sessions.retain(|id, session| {
        if !session.status().is_terminal() {
            return true;
        }
        info!("Evicting finished web call {} ({})", id, session.status());
        session.release();
        false
    });

    if sessions.contains_key(&call_id) {
        return error_response(
            StatusCode::CONFLICT,
            format!("Call {} is already joined", call_id),
        );
    }

    let session = match LiveCallSession::start(handle, &state.transport) {
        Ok(session) => Arc::new(session),
        Err(e @ SessionError::InvalidHandle(_)) => {
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
        Err(e) => {
            error!("Failed to start live session: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let status = session.status();
    sessions.insert(call_id.clone(), session);
    drop(sessions);

    info!("Joined web call {} ({})", call_id, status);

    let message = status
        .operator_message()
        .unwrap_or("Waiting for conversation to start...")
        .to_string();

    (
        StatusCode::OK,
        Json(WebCallResponse {
            call_id,
            status,
            message,
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /webcalls
/// Create a web call on the provider and join it
pub async fn create_web_call(State(state): State<AppState>) -> impl IntoResponse {
    match state.webcall.create_web_call().await {
        Ok(handle) => join(&state, handle).await,
        Err(e) => api_error_response(e),
    }
}

/// POST /webcalls/join
/// Join a web call created elsewhere
pub async fn join_web_call(
    State(state): State<AppState>,
    Json(req): Json<JoinWebCallRequest>,
) -> impl IntoResponse {
    join(&state, CallSessionHandle::new(req.call_id, req.access_token)).await
}

/// GET /webcalls/:call_id/status
pub async fn get_web_call_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&call_id) {
        Some(session) => (StatusCode::OK, Json(session.stats())).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Call {} not found", call_id)),
    }
}

/// GET /webcalls/:call_id/transcript
/// Transcript accumulated so far
pub async fn get_web_call_transcript(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&call_id) {
        Some(session) => (StatusCode::OK, Json(session.transcript())).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Call {} not found", call_id)),
    }
}

/// POST /webcalls/:call_id/end
/// Hang up and forget the session
pub async fn end_web_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    info!("Ending web call {}", call_id);

    // Find and remove session
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&call_id)
    };

    match session {
        Some(session) => {
            session.hang_up();
            (StatusCode::OK, Json(session.stats())).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, format!("Call {} not found", call_id)),
    }
}

/// POST /calls/outbound
/// Ask the webhook to place an outbound call
pub async fn trigger_outbound_call(
    State(state): State<AppState>,
    Json(req): Json<OutboundCallRequest>,
) -> impl IntoResponse {
    match state.outbound.trigger_call(&req.phone_number).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "message": format!("Successfully sent {} to the webhook.", req.phone_number.trim()),
            })),
        )
            .into_response(),
        Err(e) => api_error_response(e),
    }
}

/// GET /calls
pub async fn list_calls(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.call_history().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => store_error_response("conversations", e),
    }
}

/// GET /analysis
pub async fn list_analysis(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.semantic_analysis().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => store_error_response("analysis data", e),
    }
}

/// GET /meetings
/// Upcoming tours, soonest first
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    let today = chrono::Utc::now().date_naive();

    match state.store.upcoming_meetings(today).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => store_error_response("scheduled meetings", e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
