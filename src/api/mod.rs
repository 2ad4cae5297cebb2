//! Clients for the calling provider's HTTP endpoints
//!
//! - `WebCallClient` - creates web call sessions (`POST /v2/create-web-call`)
//! - `OutboundCallClient` - asks the automation webhook to place an outbound call

mod error;
mod outbound;
mod webcall;

pub use error::ApiError;
pub use outbound::OutboundCallClient;
pub use webcall::WebCallClient;
