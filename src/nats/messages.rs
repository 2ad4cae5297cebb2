use crate::transport::{StartConversation, TransportEvent};
use serde::{Deserialize, Serialize};

/// Command published to the web-call gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GatewayCommand {
    StartConversation(StartConversation),
    StopConversation { call_id: String },
}

/// Event received from the web-call gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GatewayEvent {
    Open,
    Message { payload: String },
    Error { payload: String },
    Close,
    ConversationStarted,
    ConversationEnded,
}

impl From<GatewayEvent> for TransportEvent {
    fn from(event: GatewayEvent) -> Self {
        match event {
            GatewayEvent::Open => TransportEvent::Open,
            GatewayEvent::Message { payload } => TransportEvent::Message(payload),
            GatewayEvent::Error { payload } => TransportEvent::Error(payload),
            GatewayEvent::Close => TransportEvent::Close,
            GatewayEvent::ConversationStarted => TransportEvent::Started,
            GatewayEvent::ConversationEnded => TransportEvent::Ended,
        }
    }
}
