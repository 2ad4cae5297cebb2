use super::error::ApiError;
use crate::session::CallSessionHandle;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
struct CreateWebCallRequest<'a> {
    agent_id: &'a str,
}

/// Creates web call sessions on the calling provider
pub struct WebCallClient {
    client: Client,
    base_url: String,
    api_key: String,
    agent_id: String,
}

impl WebCallClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            agent_id: agent_id.into(),
        }
    }

    /// Create a new web call and return its handle
    pub async fn create_web_call(&self) -> Result<CallSessionHandle, ApiError> {
        let url = format!("{}/v2/create-web-call", self.base_url);

        info!("Creating web call for agent {}", self.agent_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateWebCallRequest {
                agent_id: &self.agent_id,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_body(status.as_u16(), &body);
            error!("Failed to create web call: {}", err);
            return Err(err);
        }

        let handle: CallSessionHandle = response.json().await?;

        info!("Created web call {}", handle.call_id());

        Ok(handle)
    }
}
