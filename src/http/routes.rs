use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Live web calls
        .route("/webcalls", post(handlers::create_web_call))
        .route("/webcalls/join", post(handlers::join_web_call))
        .route(
            "/webcalls/:call_id/status",
            get(handlers::get_web_call_status),
        )
        .route(
            "/webcalls/:call_id/transcript",
            get(handlers::get_web_call_transcript),
        )
        .route("/webcalls/:call_id/end", post(handlers::end_web_call))
        // Outbound calls
        .route("/calls/outbound", post(handlers::trigger_outbound_call))
        // Dashboard reads
        .route("/calls", get(handlers::list_calls))
        .route("/analysis", get(handlers::list_analysis))
        .route("/meetings", get(handlers::list_meetings))
        // Dashboard frontend runs on another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
