use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of `call_history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub caller_number: Option<String>,
    #[serde(default)]
    pub recipient_number: Option<String>,
    /// Call length in seconds
    #[serde(default)]
    pub call_duration: Option<f64>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub tour_date: Option<NaiveDate>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub disconnection_reason: Option<String>,
}

/// One row of `semantic_analysis`, keyed to `call_history.id` by `call_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticAnalysis {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub call_id: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    /// 0.0 to 1.0
    #[serde(default)]
    pub agent_confidence: Option<f64>,
    #[serde(default)]
    pub positive_indicators: Option<serde_json::Value>,
    #[serde(default)]
    pub negative_indicators: Option<serde_json::Value>,
    #[serde(default)]
    pub predicted_outcome: Option<String>,
    #[serde(default)]
    pub alert_status: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub conversation_duration_seconds: Option<f64>,
    #[serde(default)]
    pub total_customer_words: Option<i64>,
    /// 0.0 to 1.0
    #[serde(default)]
    pub agent_talk_time_percentage: Option<f64>,
    #[serde(default)]
    pub buying_signals: Option<serde_json::Value>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Scheduled tour, projected from `call_history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub recipient_number: Option<String>,
    pub tour_date: NaiveDate,
}
