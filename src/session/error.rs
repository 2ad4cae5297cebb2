use thiserror::Error;

/// Live session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid call session handle: {0}")]
    InvalidHandle(&'static str),

    #[error("Calling transport is not available")]
    CapabilityUnavailable,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}
