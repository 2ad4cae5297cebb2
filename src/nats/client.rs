use super::messages::GatewayCommand;
use anyhow::{Context, Result};
use async_nats::Client;
use tracing::{debug, info};

pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self::new(client))
    }

    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Subject the gateway listens on for commands about `call_id`
    pub fn control_subject(call_id: &str) -> String {
        format!("webcall.{}.control", call_id)
    }

    /// Subject the gateway publishes events about `call_id` to
    pub fn events_subject(call_id: &str) -> String {
        format!("webcall.{}.events", call_id)
    }

    /// Publish a command for one call to the gateway
    pub async fn publish_command(&self, call_id: &str, command: &GatewayCommand) -> Result<()> {
        let subject = Self::control_subject(call_id);
        let payload = serde_json::to_vec(command)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish gateway command")?;

        self.client
            .flush()
            .await
            .context("Failed to flush gateway command")?;

        // Command bodies carry the access token, so only the subject is logged
        debug!("Published gateway command to {}", subject);

        Ok(())
    }

    /// Subscribe to gateway events for one call
    pub async fn subscribe_events(&self, call_id: &str) -> Result<async_nats::Subscriber> {
        let subject = Self::events_subject(call_id);

        info!("Subscribing to call events on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to call events")?;

        Ok(subscriber)
    }
}
