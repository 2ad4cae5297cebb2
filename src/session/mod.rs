//! Live call session management
//!
//! This module provides the `LiveCallSession` abstraction that manages:
//! - One real-time call connection from start to release
//! - Connection status (`connecting` → `live` → `ended`, or `error`)
//! - The running transcript streamed in by the transport
//! - Exactly-once teardown on hangup, drop, remote hangup or transport error

mod error;
mod handle;
mod session;
mod stats;
mod status;
mod transcript;

pub use error::SessionError;
pub use handle::CallSessionHandle;
pub use session::{LiveCallSession, SessionUpdate};
pub use stats::SessionStats;
pub use status::{transition, SessionStatus};
pub use transcript::{decode_update, Role, TranscriptEntry};
