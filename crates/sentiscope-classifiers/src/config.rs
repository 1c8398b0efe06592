//! Classifier backend configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hugging Face repository of the default sentiment model
pub const DEFAULT_MODEL: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Which classifier implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local DistilBERT inference with Candle
    #[default]
    Distilbert,
    /// Hosted inference endpoint returning pipeline-style JSON
    Remote,
    /// Keyword lexicon, no model download
    Lexicon,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distilbert" | "candle" => Ok(Self::Distilbert),
            "remote" | "api" => Ok(Self::Remote),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(format!(
                "unknown backend '{}' (expected distilbert, remote or lexicon)",
                other
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Distilbert => "distilbert",
            Self::Remote => "remote",
            Self::Lexicon => "lexicon",
        })
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Backend implementation
    #[serde(default)]
    pub backend: Backend,

    /// Hugging Face repository id
    #[serde(default = "default_model")]
    pub model: String,

    /// Repository revision
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Remote backend settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote inference endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Endpoint URL; defaults to the hosted inference API for `model`
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: default_model(),
            revision: default_revision(),
            device: default_device(),
            max_length: default_max_length(),
            remote: RemoteConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Endpoint used by the remote backend
    pub fn remote_url(&self) -> String {
        self.remote.url.clone().unwrap_or_else(|| {
            format!(
                "https://api-inference.huggingface.co/models/{}",
                self.model
            )
        })
    }

    /// Identifier reported in telemetry
    pub fn model_id(&self) -> String {
        match self.backend {
            Backend::Lexicon => crate::lexicon::MODEL_ID.to_string(),
            _ => self.model.clone(),
        }
    }
}
