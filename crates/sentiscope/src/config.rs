//! Application configuration

use crate::cli::GlobalArgs;
use sentiscope_classifiers::ClassifierConfig;
use sentiscope_corpus::CorpusSource;
use sentiscope_telemetry::{HttpSink, NoopSink, TelemetrySink};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Review corpus: TSV file path or http(s) URL
    #[serde(default = "default_corpus")]
    pub corpus: String,

    /// Sentiment classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable telemetry
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Collection endpoint; records are dropped when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds; unset waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            timeout_secs: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            classifier: ClassifierConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and CLI overrides.
    ///
    /// An explicit `--config` must exist. Otherwise `./sentiscope.yaml` and
    /// then `<config dir>/sentiscope/config.yaml` are tried, falling back to
    /// defaults.
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => match Self::discover() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(args);
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "Configuration file loaded");
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from("sentiscope.yaml");
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("sentiscope").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(corpus) = &args.corpus {
            self.corpus = corpus.clone();
        }

        if let Some(backend) = args.backend {
            self.classifier.backend = backend;
        }

        if let Some(model) = &args.model {
            self.classifier.model = model.clone();
        }

        if let Some(token) = &args.api_token {
            self.classifier.remote.api_token = Some(token.clone());
        }

        if let Some(endpoint) = &args.endpoint {
            self.telemetry.endpoint = Some(endpoint.clone());
        }

        if args.no_telemetry {
            self.telemetry.enabled = false;
        }
    }

    pub fn corpus_source(&self) -> CorpusSource {
        match self.corpus.parse() {
            Ok(source) => source,
            Err(never) => match never {},
        }
    }

    /// Build the telemetry sink described by this configuration
    pub fn telemetry_sink(&self) -> sentiscope_core::Result<Arc<dyn TelemetrySink>> {
        let endpoint = match (&self.telemetry.endpoint, self.telemetry.enabled) {
            (Some(endpoint), true) => endpoint,
            (None, true) => {
                tracing::info!("No telemetry endpoint configured; records will not be sent");
                return Ok(Arc::new(NoopSink));
            }
            (_, false) => {
                tracing::info!("Telemetry disabled");
                return Ok(Arc::new(NoopSink));
            }
        };

        let timeout = self.telemetry.timeout_secs.map(Duration::from_secs);
        Ok(Arc::new(HttpSink::with_timeout(endpoint.clone(), timeout)?))
    }
}

fn default_corpus() -> String {
    "reviews_test.tsv".to_string()
}

fn default_true() -> bool {
    true
}
