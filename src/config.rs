use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub webcall: WebCallConfig,
    pub outbound: OutboundConfig,
    pub row_store: RowStoreConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct WebCallConfig {
    /// Calling provider API root
    #[serde(default = "default_webcall_api_url")]
    pub api_url: String,
    /// Bearer key for the provider API (prefer LOQA_CALLDESK__WEBCALL__API_KEY)
    pub api_key: String,
    pub agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OutboundConfig {
    pub webhook_url: String,
}

#[derive(Debug, Deserialize)]
pub struct RowStoreConfig {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransportConfig {
    /// Web-call gateway NATS server; unset means no calling transport
    pub nats_url: Option<String>,
}

fn default_webcall_api_url() -> String {
    "https://api.retellai.com".to_string()
}

impl Config {
    /// Load `<path>.toml` (or any format the extension names), then apply
    /// `LOQA_CALLDESK__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("LOQA_CALLDESK").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}
