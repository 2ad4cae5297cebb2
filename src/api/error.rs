use thiserror::Error;

/// Errors from the provider endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Please enter a valid phone number.")]
    InvalidPhoneNumber,
}

impl ApiError {
    /// Build an `Api` error from a non-2xx response body
    ///
    /// Prefers the body's `error` field, then the JSON body itself, then the
    /// raw text, then a generic status message.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match value.get("error") {
                Some(serde_json::Value::String(error)) if !error.is_empty() => error.clone(),
                Some(error) if error.is_object() || error.is_array() => error.to_string(),
                _ => value.to_string(),
            },
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => format!("Request failed with status {}.", status),
        };

        ApiError::Api { status, message }
    }
}
