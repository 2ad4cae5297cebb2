use super::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Agent => f.pad("agent"),
            Role::User => f.pad("user"),
        }
    }
}

/// One utterance in the running transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Inbound data frame from the transport, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InboundMessage {
    #[serde(rename = "transcript")]
    Transcript { data: Vec<TranscriptEntry> },
    #[serde(other)]
    Other,
}

/// Decode a transcript update into its ordered batch of entries
///
/// Anything that is not valid JSON, not tagged `"transcript"`, or carries an
/// entry with empty content is rejected as a whole.
pub fn decode_update(payload: &str) -> Result<Vec<TranscriptEntry>, SessionError> {
    let message: InboundMessage = serde_json::from_str(payload)
        .map_err(|e| SessionError::MalformedMessage(e.to_string()))?;

    match message {
        InboundMessage::Transcript { data } => {
            if data.iter().any(|entry| entry.content.trim().is_empty()) {
                return Err(SessionError::MalformedMessage(
                    "transcript entry with empty content".to_string(),
                ));
            }
            Ok(data)
        }
        InboundMessage::Other => Err(SessionError::MalformedMessage(
            "not a transcript update".to_string(),
        )),
    }
}
