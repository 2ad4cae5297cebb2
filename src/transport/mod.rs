//! Calling transport capability
//!
//! The live session never talks to a calling SDK directly. It is handed a
//! `CallTransport` that is resolved once at startup:
//! - `Available(factory)` - a `ConnectionFactory` that opens real-time call connections
//! - `Unavailable` - no calling SDK/gateway is configured; sessions fail immediately
//!
//! Connections report everything through a single `EventSink` carrying the
//! closed set of `TransportEvent`s.

mod connection;
mod events;

pub use connection::{CallTransport, Connection, ConnectionFactory};
pub use events::{EventSink, StartConversation, TransportEvent};
