//! Error types for Sentiscope

/// Result type alias using Sentiscope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentiscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Corpus fetch or parse failures
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// Classification attempted before the model finished loading
    #[error("Sentiment model is not ready yet. Please wait a moment.")]
    ClassifierNotReady,

    /// Model loading or inference errors
    #[error("classification error: {0}")]
    Classification(String),

    /// Telemetry delivery errors
    #[error("logging error: {0}")]
    Logging(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport errors from the HTTP client
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a new resource load error
    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Create a new classification error
    pub fn classification(msg: impl Into<String>) -> Self {
        Self::Classification(msg.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error should be shown to the user rather than only logged
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::ClassifierNotReady | Self::Classification(_))
    }
}
