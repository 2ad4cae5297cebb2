use super::error::SessionError;
use super::handle::CallSessionHandle;
use super::stats::SessionStats;
use super::status::{transition, SessionStatus};
use super::transcript::{decode_update, TranscriptEntry};
use crate::transport::{CallTransport, Connection, EventSink, StartConversation, TransportEvent};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// State change pushed to the owner of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Status moved to a new value
    Status(SessionStatus),
    /// One transcript batch was appended, in delivery order
    Transcript(Vec<TranscriptEntry>),
}

type CloseCallback = Box<dyn FnOnce() + Send>;

/// Mutable session state, only touched under `Shared::state`
struct SessionState {
    status: SessionStatus,
    transcript: Vec<TranscriptEntry>,
    released: bool,
    updates: mpsc::UnboundedSender<SessionUpdate>,
}

impl SessionState {
    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.notify(SessionUpdate::Status(status));
    }

    fn notify(&self, update: SessionUpdate) {
        // The owner may have dropped its receiver; state is still tracked locally
        let _ = self.updates.send(update);
    }
}

/// Part of the session reachable from the transport's event sink
struct Shared {
    call_id: String,
    state: Mutex<SessionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one transport event. Events after release are dropped.
    fn handle_event(&self, event: TransportEvent) {
        let mut state = self.lock();

        if state.released {
            debug!(
                "Dropping {} event for released call {}",
                event.name(),
                self.call_id
            );
            return;
        }

        match &event {
            TransportEvent::Open => info!("Connection established for call {}", self.call_id),
            TransportEvent::Close => info!("Connection closed for call {}", self.call_id),
            TransportEvent::Started => info!("Conversation started for call {}", self.call_id),
            TransportEvent::Ended => info!("Conversation ended for call {}", self.call_id),
            TransportEvent::Error(payload) => {
                error!("Transport error on call {}: {}", self.call_id, payload)
            }
            TransportEvent::Message(payload) => {
                if !state.status.is_terminal() {
                    match decode_update(payload) {
                        Ok(batch) if batch.is_empty() => {}
                        Ok(batch) => {
                            state.transcript.extend(batch.iter().cloned());
                            state.notify(SessionUpdate::Transcript(batch));
                        }
                        Err(e) => debug!("Ignoring message on call {}: {}", self.call_id, e),
                    }
                }
            }
        }

        let next = transition(state.status, &event);
        if next != state.status {
            state.set_status(next);
        }
    }

    /// Record a local failure (no transport event involved)
    fn fail(&self, err: SessionError) {
        error!("Call {} failed: {}", self.call_id, err);

        let mut state = self.lock();
        if !state.released && !state.status.is_terminal() {
            state.set_status(SessionStatus::Error);
        }
    }
}

/// One live web call, from `start` until release
///
/// Owns exactly one transport connection. Status and transcript changes are
/// pushed on the channel returned by `take_updates`; once the session has been
/// released (via `hang_up`, `release` or drop) nothing more is emitted.
pub struct LiveCallSession {
    /// Handle the session was started with
    handle: CallSessionHandle,

    /// State shared with the event sink
    shared: Arc<Shared>,

    /// The transport connection (taken on release)
    connection: Mutex<Option<Box<dyn Connection>>>,

    /// Invoked once on explicit hangup
    on_close: Mutex<Option<CloseCallback>>,

    /// Receiving end of the update channel until the owner takes it
    updates: Mutex<Option<mpsc::UnboundedReceiver<SessionUpdate>>>,

    /// When the session was started
    started_at: DateTime<Utc>,
}

impl LiveCallSession {
    /// Start a session for `handle` over `transport`
    ///
    /// Only an invalid handle is reported as `Err`. A missing transport or a
    /// failing connection yields a session already in `error`.
    pub fn start(handle: CallSessionHandle, transport: &CallTransport) -> Result<Self, SessionError> {
        handle.validate()?;

        let call_id = handle.call_id().to_string();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let session = Self {
            handle,
            shared: Arc::new(Shared {
                call_id: call_id.clone(),
                state: Mutex::new(SessionState {
                    status: SessionStatus::Connecting,
                    transcript: Vec::new(),
                    released: false,
                    updates: updates_tx,
                }),
            }),
            connection: Mutex::new(None),
            on_close: Mutex::new(None),
            updates: Mutex::new(Some(updates_rx)),
            started_at: Utc::now(),
        };

        let factory = match transport {
            CallTransport::Available(factory) => Arc::clone(factory),
            CallTransport::Unavailable => {
                session.shared.fail(SessionError::CapabilityUnavailable);
                return Ok(session);
            }
        };

        info!("Starting live call session {} via {}", call_id, factory.name());

        // The sink only holds a weak reference so a disposed session cannot be revived
        let weak = Arc::downgrade(&session.shared);
        let sink = EventSink::new(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_event(event);
            }
        });

        let mut connection = match factory.create_connection(sink) {
            Ok(connection) => connection,
            Err(e) => {
                session
                    .shared
                    .fail(SessionError::Transport(format!("{:#}", e)));
                return Ok(session);
            }
        };

        let request = StartConversation {
            call_id,
            access_token: session.handle.access_token().to_string(),
            enable_update: true,
        };

        if let Err(e) = connection.start_conversation(request) {
            session
                .shared
                .fail(SessionError::Transport(format!("{:#}", e)));
        }

        *session.lock_connection() = Some(connection);

        Ok(session)
    }

    /// Register the callback invoked by `hang_up`
    pub fn with_close_callback(self, callback: impl FnOnce() + Send + 'static) -> Self {
        *self.on_close.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
        self
    }

    /// Take the update stream. Returns `None` after the first call.
    pub fn take_updates(&self) -> Option<mpsc::UnboundedReceiver<SessionUpdate>> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn call_id(&self) -> &str {
        self.handle.call_id()
    }

    pub fn handle(&self) -> &CallSessionHandle {
        &self.handle
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.lock().status
    }

    /// Snapshot of the transcript received so far
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.shared.lock().transcript.clone()
    }

    pub fn is_released(&self) -> bool {
        self.shared.lock().released
    }

    pub fn stats(&self) -> SessionStats {
        let state = self.shared.lock();
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            call_id: self.shared.call_id.clone(),
            status: state.status,
            label: state.status.label(),
            message: state.status.operator_message(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            transcript_entries: state.transcript.len(),
            released: state.released,
        }
    }

    /// Release the connection without notifying the close callback
    ///
    /// Detaches the event sink, then stops the conversation at most once.
    /// Returns `false` if the session was already released.
    pub fn release(&self) -> bool {
        {
            let mut state = self.shared.lock();
            if state.released {
                return false;
            }
            state.released = true;
        }

        let connection = self.lock_connection().take();
        if let Some(mut connection) = connection {
            if let Err(e) = connection.stop_conversation() {
                warn!(
                    "Failed to stop conversation for call {}: {:#}",
                    self.shared.call_id, e
                );
            }
        }

        info!("Released live call session {}", self.shared.call_id);
        true
    }

    /// Explicit hangup: release the connection, then invoke the close callback
    pub fn hang_up(&self) {
        self.release();

        let callback = self
            .on_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn lock_connection(&self) -> MutexGuard<'_, Option<Box<dyn Connection>>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LiveCallSession {
    fn drop(&mut self) {
        self.release();
    }
}
