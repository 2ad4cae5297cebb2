use super::client::NatsClient;
use super::messages::{GatewayCommand, GatewayEvent};
use crate::transport::{
    CallTransport, Connection, ConnectionFactory, EventSink, StartConversation, TransportEvent,
};
use anyhow::{bail, Context, Result};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Connection factory bridging to a web-call gateway over NATS
///
/// Each connection subscribes to `webcall.<call_id>.events` and sends
/// commands on `webcall.<call_id>.control`.
pub struct NatsTransport {
    client: Arc<NatsClient>,
    runtime: Handle,
}

impl NatsTransport {
    /// Connect to NATS. Must be called from within a tokio runtime.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = NatsClient::connect(url).await?;

        Ok(Self {
            client: Arc::new(client),
            runtime: Handle::current(),
        })
    }
}

impl NatsTransport {
    fn connection(&self, events: EventSink) -> NatsConnection {
        NatsConnection {
            client: Arc::clone(&self.client),
            runtime: self.runtime.clone(),
            events,
            call_id: None,
            event_task: None,
            stopped: false,
        }
    }
}

impl ConnectionFactory for NatsTransport {
    fn create_connection(&self, events: EventSink) -> Result<Box<dyn Connection>> {
        Ok(Box::new(self.connection(events)))
    }

    fn name(&self) -> &str {
        "nats"
    }
}

struct NatsConnection {
    client: Arc<NatsClient>,
    runtime: Handle,
    events: EventSink,
    call_id: Option<String>,
    event_task: Option<JoinHandle<()>>,
    stopped: bool,
}

impl Connection for NatsConnection {
    fn start_conversation(&mut self, request: StartConversation) -> Result<()> {
        if self.stopped {
            bail!("Connection already stopped");
        }
        if self.call_id.is_some() {
            bail!("Conversation already started");
        }

        let call_id = request.call_id.clone();
        self.call_id = Some(call_id.clone());

        let client = Arc::clone(&self.client);
        let events = self.events.clone();

        let task = self.runtime.spawn(async move {
            // Subscribe before asking the gateway to start so no event is missed
            let mut subscriber = match client.subscribe_events(&call_id).await {
                Ok(subscriber) => subscriber,
                Err(e) => {
                    events.emit(TransportEvent::Error(format!("{:#}", e)));
                    return;
                }
            };

            if let Err(e) = client
                .publish_command(&call_id, &GatewayCommand::StartConversation(request))
                .await
            {
                events.emit(TransportEvent::Error(format!("{:#}", e)));
                return;
            }

            info!("Call event listener started for {}", call_id);

            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<GatewayEvent>(&msg.payload) {
                    Ok(event) => events.emit(event.into()),
                    Err(e) => warn!("Failed to parse gateway event for {}: {}", call_id, e),
                }
            }

            info!("Call event subscription ended for {}", call_id);
            events.emit(TransportEvent::Close);
        });

        self.event_task = Some(task);

        Ok(())
    }

    fn stop_conversation(&mut self) -> Result<()> {
        let Some(call_id) = self.begin_stop() else {
            return Ok(());
        };

        let client = Arc::clone(&self.client);
        self.runtime.spawn(async move {
            let command = GatewayCommand::StopConversation {
                call_id: call_id.clone(),
            };
            if let Err(e) = client
                .publish_command(&call_id, &command)
                .await
                .context("Failed to send stop command")
            {
                error!("Call {}: {:#}", call_id, e);
            }
        });

        Ok(())
    }
}

impl NatsConnection {
    /// Mark the connection stopped and abort the event listener
    ///
    /// Returns the call to send the stop command for: `None` if the
    /// connection was already stopped or never started a conversation.
    fn begin_stop(&mut self) -> Option<String> {
        if self.stopped {
            return None;
        }
        self.stopped = true;

        if let Some(task) = self.event_task.take() {
            task.abort();
        }

        self.call_id.clone()
    }
}

impl Drop for NatsConnection {
    fn drop(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}

impl NatsTransport {
    /// Resolve the calling capability once at startup
    ///
    /// No URL, or a gateway that cannot be reached, leaves the capability
    /// `Unavailable`; every session started with it goes straight to `error`.
    pub async fn resolve(nats_url: Option<&str>) -> CallTransport {
        let Some(url) = nats_url else {
            warn!("No web-call gateway configured; live calls are unavailable");
            return CallTransport::Unavailable;
        };

        match Self::connect(url).await {
            Ok(transport) => CallTransport::available(transport),
            Err(e) => {
                error!("Web-call gateway unavailable: {:#}", e);
                CallTransport::Unavailable
            }
        }
    }
}
