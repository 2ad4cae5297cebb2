use super::error::SessionError;
use serde::Deserialize;
use std::fmt;

/// Identifies one pre-created web call
///
/// Returned by the session-creation endpoint. The access token is a
/// credential: it is redacted from `Debug` output and never serialized back out.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CallSessionHandle {
    call_id: String,
    access_token: String,
}

impl CallSessionHandle {
    pub fn new(call_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Both fields must be non-empty, and the call ID must be usable as a
    /// single subject token (no `.`, `*`, `>` or whitespace)
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.call_id.trim().is_empty() {
            return Err(SessionError::InvalidHandle("call_id is empty"));
        }
        if self
            .call_id
            .chars()
            .any(|c| matches!(c, '.' | '*' | '>') || c.is_whitespace())
        {
            return Err(SessionError::InvalidHandle(
                "call_id contains '.', '*', '>' or whitespace",
            ));
        }
        if self.access_token.trim().is_empty() {
            return Err(SessionError::InvalidHandle("access_token is empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for CallSessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSessionHandle")
            .field("call_id", &self.call_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
