pub mod api;
pub mod config;
pub mod http;
pub mod nats;
pub mod session;
pub mod store;
pub mod transport;

pub use api::{ApiError, OutboundCallClient, WebCallClient};
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{GatewayCommand, GatewayEvent, NatsClient, NatsTransport};
pub use session::{
    CallSessionHandle, LiveCallSession, Role, SessionError, SessionStats, SessionStatus,
    SessionUpdate, TranscriptEntry,
};
pub use store::{CallRecord, Meeting, RowStore, SemanticAnalysis, StoreError};
pub use transport::{
    CallTransport, Connection, ConnectionFactory, EventSink, StartConversation, TransportEvent,
};
