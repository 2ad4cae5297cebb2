//! Display helpers for operator tables

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

const NOT_AVAILABLE: &str = "N/A";
const JSON_PREVIEW_CHARS: usize = 50;

/// `125.0` → `"2m 5s"`
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) => {
            let minutes = (seconds / 60.0).floor();
            let remaining = (seconds % 60.0).round();
            format!("{}m {}s", minutes as i64, remaining as i64)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Fraction in `0.0..=1.0` → `"85.3%"`
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}%", value * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `"May 1, 2024, 02:30 PM"`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// `"Monday, June 3, 2024"`
pub fn format_tour_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%A, %B %-d, %Y").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Short single-line preview of a JSON column
pub fn preview_json(value: Option<&Value>) -> String {
    let content = match value {
        None | Some(Value::Null) => return "None".to_string(),
        Some(Value::Object(map)) if map.is_empty() => return "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    if content.chars().count() > JSON_PREVIEW_CHARS {
        let truncated: String = content.chars().take(JSON_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    } else {
        content
    }
}
