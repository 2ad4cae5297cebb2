use crate::api::{OutboundCallClient, WebCallClient};
use crate::config::Config;
use crate::session::LiveCallSession;
use crate::store::RowStore;
use crate::transport::CallTransport;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active live call sessions (call_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<LiveCallSession>>>>,

    /// Calling capability handed to every new session
    pub transport: CallTransport,

    pub webcall: Arc<WebCallClient>,
    pub outbound: Arc<OutboundCallClient>,
    pub store: Arc<RowStore>,
}

impl AppState {
    pub fn new(
        transport: CallTransport,
        webcall: WebCallClient,
        outbound: OutboundCallClient,
        store: RowStore,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            transport,
            webcall: Arc::new(webcall),
            outbound: Arc::new(outbound),
            store: Arc::new(store),
        }
    }

    pub fn from_config(cfg: &Config, transport: CallTransport) -> Self {
        Self::new(
            transport,
            WebCallClient::new(&cfg.webcall.api_url, &cfg.webcall.api_key, &cfg.webcall.agent_id),
            OutboundCallClient::new(&cfg.outbound.webhook_url),
            RowStore::new(&cfg.row_store.url, &cfg.row_store.api_key),
        )
    }

    /// Hang up every live session (server shutdown)
    pub async fn end_all(&self) {
        let sessions: Vec<_> = self.sessions.write().await.drain().collect();
        for (_, session) in sessions {
            session.hang_up();
        }
    }
}
