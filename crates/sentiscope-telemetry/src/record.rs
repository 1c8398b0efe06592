//! Per-action telemetry payload

use crate::environment::ClientEnvironment;
use chrono::{SecondsFormat, Utc};
use sentiscope_core::{Review, SentimentCategory, SentimentResult};
use serde::{Deserialize, Serialize};

/// Sentiment block of a telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub label: String,
    pub category: SentimentCategory,
    pub confidence: f32,
}

/// Record sent to the logging endpoint after each analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// ISO-8601 UTC time with milliseconds
    pub timestamp: String,
    pub review: String,
    pub sentiment: SentimentSummary,
    /// Percentage with one decimal, e.g. `"82.3"`
    pub confidence: String,
    pub meta: ClientEnvironment,
}

impl TelemetryRecord {
    pub fn new(review: &Review, result: &SentimentResult, meta: ClientEnvironment) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            review: review.as_str().to_string(),
            sentiment: SentimentSummary {
                label: result.label.clone(),
                category: result.category,
                confidence: result.score,
            },
            confidence: result.confidence_value(),
            meta,
        }
    }
}
