use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Everything a call connection can report back to its session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection established
    Open,
    /// Inbound data frame (opaque JSON text)
    Message(String),
    /// Transport failure; payload is diagnostic text only
    Error(String),
    /// Connection closed
    Close,
    /// Remote side started the conversation
    Started,
    /// Remote side ended the conversation
    Ended,
}

impl TransportEvent {
    /// Short name for logging (never includes the payload)
    pub fn name(&self) -> &'static str {
        match self {
            TransportEvent::Open => "open",
            TransportEvent::Message(_) => "message",
            TransportEvent::Error(_) => "error",
            TransportEvent::Close => "close",
            TransportEvent::Started => "conversation_started",
            TransportEvent::Ended => "conversation_ended",
        }
    }
}

/// Request issued on a connection to join a pre-created call
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConversation {
    pub call_id: String,
    pub access_token: String,
    /// Ask the remote side for incremental transcript updates
    pub enable_update: bool,
}

impl fmt::Debug for StartConversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartConversation")
            .field("call_id", &self.call_id)
            .field("access_token", &"<redacted>")
            .field("enable_update", &self.enable_update)
            .finish()
    }
}

/// Single listener a connection delivers its events to
///
/// Cloning is cheap; every clone feeds the same handler.
#[derive(Clone)]
pub struct EventSink {
    handler: Arc<dyn Fn(TransportEvent) + Send + Sync>,
}

impl EventSink {
    pub fn new(handler: impl Fn(TransportEvent) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Deliver one event to the listener
    pub fn emit(&self, event: TransportEvent) {
        (self.handler)(event);
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}
