use crate::transport::TransportEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection status of a live call session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Waiting for the remote side to start the conversation (initial)
    Connecting,
    /// Conversation in progress
    Live,
    /// Conversation finished (terminal)
    Ended,
    /// Transport failed or was never available (terminal)
    Error,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Ended | SessionStatus::Error)
    }

    /// Human-readable status label for operator views
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::Connecting => "Connecting...",
            SessionStatus::Live => "Live",
            SessionStatus::Ended => "Call Ended",
            SessionStatus::Error => "Error",
        }
    }

    /// Generic message shown to the operator; raw transport errors are only logged
    pub fn operator_message(self) -> Option<&'static str> {
        match self {
            SessionStatus::Error => {
                Some("Could not connect to the call. Please close and try again.")
            }
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Connecting => "connecting",
            SessionStatus::Live => "live",
            SessionStatus::Ended => "ended",
            SessionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Next status after `event`
///
/// Terminal states absorb every event, so an `Error` is never overwritten
/// by a later `Close` or `Ended`.
pub fn transition(status: SessionStatus, event: &TransportEvent) -> SessionStatus {
    if status.is_terminal() {
        return status;
    }

    match event {
        TransportEvent::Started => SessionStatus::Live,
        TransportEvent::Error(_) => SessionStatus::Error,
        TransportEvent::Close | TransportEvent::Ended => SessionStatus::Ended,
        TransportEvent::Open | TransportEvent::Message(_) => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_moves_connecting_to_live() {
        assert_eq!(
            transition(SessionStatus::Connecting, &TransportEvent::Started),
            SessionStatus::Live
        );
        assert_eq!(
            transition(SessionStatus::Live, &TransportEvent::Started),
            SessionStatus::Live
        );
    }

    #[test]
    fn test_open_and_message_keep_status() {
        for status in [SessionStatus::Connecting, SessionStatus::Live] {
            assert_eq!(transition(status, &TransportEvent::Open), status);
            assert_eq!(
                transition(status, &TransportEvent::Message("{}".to_string())),
                status
            );
        }
    }

    #[test]
    fn test_close_and_ended_finish_session() {
        for status in [SessionStatus::Connecting, SessionStatus::Live] {
            assert_eq!(transition(status, &TransportEvent::Close), SessionStatus::Ended);
            assert_eq!(transition(status, &TransportEvent::Ended), SessionStatus::Ended);
        }
    }

    #[test]
    fn test_error_is_terminal() {
        let status = transition(
            SessionStatus::Live,
            &TransportEvent::Error("socket reset".to_string()),
        );
        assert_eq!(status, SessionStatus::Error);

        assert_eq!(transition(status, &TransportEvent::Close), SessionStatus::Error);
        assert_eq!(transition(status, &TransportEvent::Ended), SessionStatus::Error);
        assert_eq!(transition(status, &TransportEvent::Started), SessionStatus::Error);
    }

    #[test]
    fn test_ended_ignores_late_error() {
        assert_eq!(
            transition(SessionStatus::Ended, &TransportEvent::Error("late".to_string())),
            SessionStatus::Ended
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SessionStatus::Live).unwrap(), "\"live\"");
        assert_eq!(SessionStatus::Connecting.to_string(), "connecting");
        assert!(SessionStatus::Error.operator_message().is_some());
        assert!(SessionStatus::Live.operator_message().is_none());
    }
}
