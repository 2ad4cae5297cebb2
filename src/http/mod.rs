//! HTTP API for the operator dashboard
//!
//! This module provides a REST API for live web calls and dashboard data:
//! - POST /webcalls - Create a web call and join it
//! - POST /webcalls/join - Join a pre-created web call
//! - GET /webcalls/:id/status - Query live session status
//! - GET /webcalls/:id/transcript - Get accumulated transcript
//! - POST /webcalls/:id/end - Hang up
//! - POST /calls/outbound - Request an outbound call
//! - GET /calls, /analysis, /meetings - Row store reads
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, JoinWebCallRequest, OutboundCallRequest, WebCallResponse};
pub use routes::create_router;
pub use state::AppState;
