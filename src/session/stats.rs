use super::status::SessionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of a live call session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Call identifier issued by the calling provider
    pub call_id: String,

    /// Current connection status
    pub status: SessionStatus,

    /// Operator-facing label for the status
    pub label: &'static str,

    /// Generic error text for the operator (only set in `error`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,

    /// When the session was started
    pub started_at: DateTime<Utc>,

    /// Seconds since the session was started
    pub duration_secs: f64,

    /// Number of transcript entries received
    pub transcript_entries: usize,

    /// Whether the connection has been released
    pub released: bool,
}
