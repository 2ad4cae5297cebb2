use super::rows::{CallRecord, Meeting, SemanticAnalysis};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

/// Row store query errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Row store error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Read-only client for the row store's REST interface
pub struct RowStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RowStore {
    /// `base_url` is the project URL; tables are served under `/rest/v1`
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// All calls, newest first
    pub async fn call_history(&self) -> Result<Vec<CallRecord>, StoreError> {
        self.select(
            "call_history",
            &[("select", "*".to_string()), ("order", "created_at.desc".to_string())],
        )
        .await
    }

    /// All semantic analysis results, newest first
    pub async fn semantic_analysis(&self) -> Result<Vec<SemanticAnalysis>, StoreError> {
        self.select(
            "semantic_analysis",
            &[("select", "*".to_string()), ("order", "created_at.desc".to_string())],
        )
        .await
    }

    /// Calls with a tour booked on or after `today`, soonest first
    pub async fn upcoming_meetings(&self, today: NaiveDate) -> Result<Vec<Meeting>, StoreError> {
        self.select(
            "call_history",
            &[
                ("select", "id,name,recipient_number,tour_date".to_string()),
                ("tour_date", format!("gte.{}", today.format("%Y-%m-%d"))),
                ("order", "tour_date.asc".to_string()),
            ],
        )
        .await
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        debug!("Querying {} with {:?}", table, query);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Error fetching {}: {} {}", table, status, message);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
