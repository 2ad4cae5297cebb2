// Live call session lifecycle tests
//
// A scripted in-memory transport stands in for the calling SDK so every
// transition and teardown path can be driven deterministically.

use anyhow::{bail, Result};
use loqa_calldesk::{
    CallSessionHandle, CallTransport, Connection, ConnectionFactory, EventSink, LiveCallSession,
    Role, SessionError, SessionStatus, SessionUpdate, StartConversation, TranscriptEntry,
    TransportEvent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    connections: usize,
    started: Vec<StartConversation>,
    stops: usize,
    sink: Option<EventSink>,
}

#[derive(Clone, Default)]
struct FakeTransport {
    recorder: Arc<Mutex<Recorder>>,
    /// Events fired synchronously from `start_conversation`
    on_start: Vec<TransportEvent>,
    fail_create: bool,
    fail_start: bool,
    fail_stop: bool,
}

impl FakeTransport {
    fn new() -> Self {
        Self::default()
    }

    fn firing(events: Vec<TransportEvent>) -> Self {
        Self {
            on_start: events,
            ..Self::default()
        }
    }

    fn capability(&self) -> CallTransport {
        CallTransport::available(self.clone())
    }

    /// Deliver an event as the transport would
    fn emit(&self, event: TransportEvent) {
        let sink = self.recorder.lock().unwrap().sink.clone();
        sink.expect("no connection created").emit(event);
    }

    fn stops(&self) -> usize {
        self.recorder.lock().unwrap().stops
    }

    fn connections(&self) -> usize {
        self.recorder.lock().unwrap().connections
    }
}

impl ConnectionFactory for FakeTransport {
    fn create_connection(&self, events: EventSink) -> Result<Box<dyn Connection>> {
        if self.fail_create {
            bail!("sdk refused to create a connection");
        }

        {
            let mut rec = self.recorder.lock().unwrap();
            rec.connections += 1;
            rec.sink = Some(events.clone());
        }

        Ok(Box::new(FakeConnection {
            transport: self.clone(),
            events,
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeConnection {
    transport: FakeTransport,
    events: EventSink,
}

impl Connection for FakeConnection {
    fn start_conversation(&mut self, request: StartConversation) -> Result<()> {
        self.transport.recorder.lock().unwrap().started.push(request);

        if self.transport.fail_start {
            bail!("websocket handshake failed");
        }

        for event in self.transport.on_start.clone() {
            self.events.emit(event);
        }
        Ok(())
    }

    fn stop_conversation(&mut self) -> Result<()> {
        self.transport.recorder.lock().unwrap().stops += 1;

        if self.transport.fail_stop {
            bail!("connection already closed");
        }

        // Real SDKs report the close back to the listener
        self.events.emit(TransportEvent::Close);
        Ok(())
    }
}

fn handle() -> CallSessionHandle {
    CallSessionHandle::new("c1", "t1")
}

fn transcript_message(entries: &[(&str, &str)]) -> TransportEvent {
    let data: Vec<serde_json::Value> = entries
        .iter()
        .map(|(role, content)| serde_json::json!({ "role": role, "content": content }))
        .collect();

    TransportEvent::Message(serde_json::json!({ "type": "transcript", "data": data }).to_string())
}

fn drain(updates: &mut tokio::sync::mpsc::UnboundedReceiver<SessionUpdate>) -> Vec<SessionUpdate> {
    let mut seen = Vec::new();
    while let Ok(update) = updates.try_recv() {
        seen.push(update);
    }
    seen
}

#[test]
fn test_started_immediately_goes_live_with_empty_transcript() {
    let transport = FakeTransport::firing(vec![TransportEvent::Open, TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    assert_eq!(session.status(), SessionStatus::Live);
    assert!(session.transcript().is_empty());
    assert_eq!(transport.connections(), 1);
}

#[test]
fn test_start_request_carries_handle_and_update_flag() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    assert_eq!(session.status(), SessionStatus::Connecting);

    let started = transport.recorder.lock().unwrap().started.clone();
    assert_eq!(
        started,
        vec![StartConversation {
            call_id: "c1".to_string(),
            access_token: "t1".to_string(),
            enable_update: true,
        }]
    );
}

#[test]
fn test_transcript_is_concatenation_of_batches() {
    let messages = vec![
        transcript_message(&[("agent", "Hello"), ("user", "Hi")]),
        transcript_message(&[("agent", "How can I help?")]),
        transcript_message(&[]),
        transcript_message(&[("user", "Hi"), ("user", "Hi")]),
    ];

    let run = |messages: &[TransportEvent]| {
        let transport = FakeTransport::firing(vec![TransportEvent::Started]);
        let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
        for message in messages {
            transport.emit(message.clone());
        }
        session.transcript()
    };

    let first = run(&messages);
    assert_eq!(
        first,
        vec![
            TranscriptEntry::new(Role::Agent, "Hello"),
            TranscriptEntry::new(Role::User, "Hi"),
            TranscriptEntry::new(Role::Agent, "How can I help?"),
            TranscriptEntry::new(Role::User, "Hi"),
            TranscriptEntry::new(Role::User, "Hi"),
        ]
    );

    // Replaying through a fresh session gives the same transcript
    assert_eq!(run(&messages), first);
}

#[test]
fn test_transcript_accepted_while_connecting() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(transcript_message(&[("agent", "Early")]));

    assert_eq!(session.status(), SessionStatus::Connecting);
    assert_eq!(session.transcript().len(), 1);
}

#[test]
fn test_malformed_messages_change_nothing() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
    transport.emit(transcript_message(&[("agent", "Hello")]));

    let mut updates = session.take_updates().unwrap();
    drain(&mut updates);

    for payload in [
        "not json",
        r#"{"type":"update","data":[{"role":"agent","content":"x"}]}"#,
        r#"{"data":[{"role":"agent","content":"x"}]}"#,
        r#"{"type":"transcript","data":[{"role":"robot","content":"x"}]}"#,
        r#"{"type":"transcript","data":"nope"}"#,
    ] {
        transport.emit(TransportEvent::Message(payload.to_string()));
    }

    assert_eq!(session.status(), SessionStatus::Live);
    assert_eq!(
        session.transcript(),
        vec![TranscriptEntry::new(Role::Agent, "Hello")]
    );
    assert!(drain(&mut updates).is_empty());
}

#[test]
fn test_updates_follow_delivery_order() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
    let mut updates = session.take_updates().unwrap();

    transport.emit(TransportEvent::Open);
    transport.emit(TransportEvent::Started);
    transport.emit(transcript_message(&[("agent", "Hello")]));
    transport.emit(TransportEvent::Ended);

    assert_eq!(
        drain(&mut updates),
        vec![
            SessionUpdate::Status(SessionStatus::Live),
            SessionUpdate::Transcript(vec![TranscriptEntry::new(Role::Agent, "Hello")]),
            SessionUpdate::Status(SessionStatus::Ended),
        ]
    );
    assert!(session.take_updates().is_none());
}

#[test]
fn test_error_is_terminal() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(TransportEvent::Error("ice connection failed".to_string()));
    assert_eq!(session.status(), SessionStatus::Error);

    transport.emit(TransportEvent::Close);
    transport.emit(TransportEvent::Ended);
    transport.emit(TransportEvent::Started);

    assert_eq!(session.status(), SessionStatus::Error);
    assert_eq!(
        session.stats().message,
        Some("Could not connect to the call. Please close and try again.")
    );
}

#[test]
fn test_error_while_connecting() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(TransportEvent::Error("rejected".to_string()));

    assert_eq!(session.status(), SessionStatus::Error);
}

#[test]
fn test_messages_after_end_are_not_appended() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(TransportEvent::Ended);
    transport.emit(transcript_message(&[("agent", "Too late")]));

    assert_eq!(session.status(), SessionStatus::Ended);
    assert!(session.transcript().is_empty());
}

#[test]
fn test_scenario_hello_then_close() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(TransportEvent::Started);
    transport.emit(TransportEvent::Message(
        r#"{"type":"transcript","data":[{"role":"agent","content":"Hello"}]}"#.to_string(),
    ));
    transport.emit(TransportEvent::Close);

    assert_eq!(session.status(), SessionStatus::Ended);
    assert_eq!(
        session.transcript(),
        vec![TranscriptEntry::new(Role::Agent, "Hello")]
    );
}

#[test]
fn test_hang_up_twice_stops_once() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let closed = Arc::new(AtomicUsize::new(0));
    let closed_clone = Arc::clone(&closed);

    let session = LiveCallSession::start(handle(), &transport.capability())
        .unwrap()
        .with_close_callback(move || {
            closed_clone.fetch_add(1, Ordering::SeqCst);
        });

    session.hang_up();
    session.hang_up();

    assert_eq!(transport.stops(), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(session.is_released());

    drop(session);
    assert_eq!(transport.stops(), 1);
}

#[test]
fn test_release_is_idempotent() {
    let transport = FakeTransport::new();
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    assert!(session.release());
    assert!(!session.release());
    assert_eq!(transport.stops(), 1);
}

#[test]
fn test_no_state_change_after_release() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
    transport.emit(transcript_message(&[("agent", "Hello")]));

    let mut updates = session.take_updates().unwrap();
    drain(&mut updates);

    session.hang_up();

    // The close the fake reports from stop_conversation is already ignored
    assert_eq!(session.status(), SessionStatus::Live);

    transport.emit(transcript_message(&[("user", "Are you there?")]));
    transport.emit(TransportEvent::Error("late".to_string()));
    transport.emit(TransportEvent::Ended);

    assert_eq!(session.status(), SessionStatus::Live);
    assert_eq!(session.transcript().len(), 1);
    assert!(drain(&mut updates).is_empty());
}

#[test]
fn test_hang_up_after_remote_close() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    transport.emit(TransportEvent::Close);
    assert_eq!(session.status(), SessionStatus::Ended);

    session.hang_up();

    assert_eq!(transport.stops(), 1);
    assert_eq!(session.status(), SessionStatus::Ended);
}

#[test]
fn test_stop_failure_is_tolerated() {
    let transport = FakeTransport {
        fail_stop: true,
        ..FakeTransport::new()
    };
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    session.hang_up();

    assert_eq!(transport.stops(), 1);
    assert!(session.is_released());
}

#[test]
fn test_drop_releases_connection() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
    let mut updates = session.take_updates().unwrap();
    drain(&mut updates);

    drop(session);
    assert_eq!(transport.stops(), 1);

    // Late events for a disposed session go nowhere
    transport.emit(transcript_message(&[("agent", "Hello")]));
    transport.emit(TransportEvent::Ended);

    assert!(drain(&mut updates).is_empty());
}

#[test]
fn test_missing_capability_fails_without_connecting() {
    let session = LiveCallSession::start(handle(), &CallTransport::Unavailable).unwrap();

    assert_eq!(session.status(), SessionStatus::Error);

    let mut updates = session.take_updates().unwrap();
    assert_eq!(
        drain(&mut updates),
        vec![SessionUpdate::Status(SessionStatus::Error)]
    );

    // Release with no connection is still safe
    assert!(session.release());
}

#[test]
fn test_connection_creation_failure_is_error() {
    let transport = FakeTransport {
        fail_create: true,
        ..FakeTransport::new()
    };
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    assert_eq!(session.status(), SessionStatus::Error);
    assert_eq!(transport.connections(), 0);
}

#[test]
fn test_start_failure_is_error_and_still_released() {
    let transport = FakeTransport {
        fail_start: true,
        ..FakeTransport::new()
    };
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();

    assert_eq!(session.status(), SessionStatus::Error);

    session.hang_up();
    assert_eq!(transport.stops(), 1);
}

#[test]
fn test_invalid_handle_is_rejected() {
    let transport = FakeTransport::new();

    let err = LiveCallSession::start(CallSessionHandle::new("", "t1"), &transport.capability())
        .err()
        .unwrap();

    assert!(matches!(err, SessionError::InvalidHandle(_)));
    assert_eq!(transport.connections(), 0);
}

#[test]
fn test_stats_reflect_session() {
    let transport = FakeTransport::firing(vec![TransportEvent::Started]);
    let session = LiveCallSession::start(handle(), &transport.capability()).unwrap();
    transport.emit(transcript_message(&[("agent", "Hello"), ("user", "Hi")]));

    let stats = session.stats();
    assert_eq!(stats.call_id, "c1");
    assert_eq!(stats.status, SessionStatus::Live);
    assert_eq!(stats.label, "Live");
    assert_eq!(stats.transcript_entries, 2);
    assert!(!stats.released);
    assert!(stats.message.is_none());
}
