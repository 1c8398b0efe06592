//! Hosted inference backend
//!
//! Posts `{"inputs": text}` to a text-classification endpoint and reads
//! back pipeline-style JSON.

use crate::classifier::{candidates_from_json, rank, Classifier};
use async_trait::async_trait;
use sentiscope_core::{Candidate, Error, Result};
use serde_json::{json, Value};

pub struct RemoteClassifier {
    name: String,
    url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            api_token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Send the token as a bearer credential
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Candidate>> {
        let mut request = self.client.post(&self.url).json(&json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::classification(format!("Inference request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::classification(format!(
                "Inference endpoint returned HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let value: Value = response.json().await.map_err(|e| {
            Error::classification(format!("Inference response was not JSON: {}", e))
        })?;

        let candidates = candidates_from_json(&value);
        if candidates.is_empty() {
            tracing::warn!(response = %value, "Inference response had no label/score pairs");
        }

        Ok(rank(candidates))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
