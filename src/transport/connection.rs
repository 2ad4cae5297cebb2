use super::events::{EventSink, StartConversation};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// One real-time call connection
///
/// Both calls must return promptly: implementations hand slow work
/// (network round trips) to a background task and report the outcome
/// through the `EventSink` they were created with.
pub trait Connection: Send {
    /// Ask the remote side to join the call described by `request`
    fn start_conversation(&mut self, request: StartConversation) -> Result<()>;

    /// Leave the call. Must be idempotent and tolerate an already-closed connection.
    fn stop_conversation(&mut self) -> Result<()>;
}

/// Opens call connections
///
/// Implementations:
/// - NATS: bridges to a web-call gateway over pub/sub subjects
/// - In-memory doubles in tests
pub trait ConnectionFactory: Send + Sync {
    /// Create a connection whose events are delivered to `events`
    fn create_connection(&self, events: EventSink) -> Result<Box<dyn Connection>>;

    /// Factory name for logging
    fn name(&self) -> &str;
}

/// Calling capability resolved once at startup and passed down explicitly
#[derive(Clone)]
pub enum CallTransport {
    /// A calling backend is configured
    Available(Arc<dyn ConnectionFactory>),
    /// No calling backend; sessions go straight to `error`
    Unavailable,
}

impl CallTransport {
    pub fn available(factory: impl ConnectionFactory + 'static) -> Self {
        CallTransport::Available(Arc::new(factory))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CallTransport::Available(_))
    }
}

impl fmt::Debug for CallTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTransport::Available(factory) => {
                f.debug_tuple("Available").field(&factory.name()).finish()
            }
            CallTransport::Unavailable => f.write_str("Unavailable"),
        }
    }
}
