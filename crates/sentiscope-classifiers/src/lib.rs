//! Sentiscope Classifiers
//!
//! Sentiment classification backends behind a single [`Classifier`] trait:
//! - [`DistilBertClassifier`]: pretrained DistilBERT SST-2 run locally with Candle
//! - [`RemoteClassifier`]: a hosted text-classification endpoint
//! - [`LexiconClassifier`]: keyword fallback with no model download
//!
//! Every backend reports raw label/score candidates; normalization into a
//! display result happens once, in [`SentimentResult::from_candidates`].
//!
//! [`SentimentResult::from_candidates`]: sentiscope_core::SentimentResult::from_candidates

pub mod classifier;
pub mod config;
#[cfg(feature = "ml-models")]
pub mod distilbert;
pub mod lexicon;
pub mod remote;

pub use classifier::{candidates_from_json, Classifier};
pub use config::{Backend, ClassifierConfig, RemoteConfig, DEFAULT_MODEL};
#[cfg(feature = "ml-models")]
pub use distilbert::DistilBertClassifier;
pub use lexicon::LexiconClassifier;
pub use remote::RemoteClassifier;

use sentiscope_core::{Error, Result};
use std::sync::Arc;

/// Shared handle to a loaded classifier
pub type SharedClassifier = Arc<dyn Classifier>;

/// Build the configured classifier backend.
///
/// Model downloads and weight loading run on the blocking thread pool.
pub async fn load_classifier(config: &ClassifierConfig) -> Result<SharedClassifier> {
    tracing::info!(backend = %config.backend, model = %config.model, "Loading classifier");

    match config.backend {
        Backend::Distilbert => load_distilbert(config.clone()).await,
        Backend::Remote => Ok(Arc::new(
            RemoteClassifier::new(config.model.clone(), config.remote_url())
                .with_api_token(config.remote.api_token.clone()),
        )),
        Backend::Lexicon => Ok(Arc::new(LexiconClassifier::new()?)),
    }
}

#[cfg(feature = "ml-models")]
async fn load_distilbert(config: ClassifierConfig) -> Result<SharedClassifier> {
    let classifier = tokio::task::spawn_blocking(move || DistilBertClassifier::load(&config))
        .await
        .map_err(|e| Error::classification(format!("Model loading task failed: {}", e)))??;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "ml-models"))]
async fn load_distilbert(_config: ClassifierConfig) -> Result<SharedClassifier> {
    Err(Error::classification(
        "DistilBERT backend requires the 'ml-models' feature",
    ))
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::{Backend, ClassifierConfig};
    pub use crate::{load_classifier, SharedClassifier};
}
