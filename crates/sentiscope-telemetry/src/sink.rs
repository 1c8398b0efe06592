//! Telemetry sinks

use crate::record::TelemetryRecord;
use async_trait::async_trait;
use sentiscope_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Destination for telemetry records
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Deliver one record, returning the endpoint's acknowledgement
    async fn send(&self, record: &TelemetryRecord) -> Result<Value>;

    /// Get the sink name
    fn name(&self) -> &str;
}

/// Posts records as JSON to a fixed endpoint.
///
/// One request per record: no retries, no idempotency key.
pub struct HttpSink {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    /// Bound each request; `None` waits indefinitely
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::config(format!(
                "telemetry endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TelemetrySink for HttpSink {
    async fn send(&self, record: &TelemetryRecord) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| Error::logging(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::logging(format!(
                "endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::logging(format!("endpoint reply was not JSON: {}", e)))
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Discards every record; used when no endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl TelemetrySink for NoopSink {
    async fn send(&self, _record: &TelemetryRecord) -> Result<Value> {
        Ok(Value::Null)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
