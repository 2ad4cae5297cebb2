pub mod client;
pub mod messages;
pub mod transport;

pub use client::NatsClient;
pub use messages::{GatewayCommand, GatewayEvent};
pub use transport::NatsTransport;
