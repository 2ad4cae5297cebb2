use super::error::ApiError;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundCallRequest<'a> {
    phone_number: &'a str,
}

/// Triggers outbound calls through the automation webhook
pub struct OutboundCallClient {
    client: Client,
    webhook_url: String,
}

impl OutboundCallClient {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// Ask the webhook to call `phone_number`. Blank numbers are rejected locally.
    pub async fn trigger_call(&self, phone_number: &str) -> Result<(), ApiError> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(ApiError::InvalidPhoneNumber);
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&OutboundCallRequest { phone_number })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            error!("Webhook request failed with status {}", status);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: format!("Webhook request failed with status {}.", status.as_u16()),
            });
        }

        info!("Outbound call requested for {}", phone_number);

        Ok(())
    }
}
