//! Corpus retrieval from the filesystem or over HTTP

use crate::corpus::Corpus;
use sentiscope_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

/// Location of the TSV review file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// Load from local file system
    Path(PathBuf),

    /// Fetch with an HTTP GET
    Url(String),
}

impl CorpusSource {
    /// Create a source from a local path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Create a source from a URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }
}

impl FromStr for CorpusSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Retrieve and parse the corpus
pub async fn load(source: &CorpusSource) -> Result<Corpus> {
    let start = Instant::now();

    let body = match source {
        CorpusSource::Path(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::resource_load(format!("Failed to read {}: {}", path.display(), e))
        })?,
        CorpusSource::Url(url) => fetch(url).await?,
    };

    let corpus = Corpus::parse_tsv(&body)?;

    tracing::info!(
        source = %source,
        reviews = corpus.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Corpus loaded"
    );

    Ok(corpus)
}

/// Retrieve the corpus, logging any failure and falling back to an empty one
pub async fn load_or_empty(source: &CorpusSource) -> Corpus {
    match load(source).await {
        Ok(corpus) => corpus,
        Err(e) => {
            tracing::error!(source = %source, error = %e, "TSV load error");
            Corpus::empty()
        }
    }
}

async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::resource_load(format!("Failed to fetch {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::resource_load(format!(
            "Fetching {} returned HTTP {}",
            url, status
        )));
    }

    response
        .text()
        .await
        .map_err(|e| Error::resource_load(format!("Failed to read body of {}: {}", url, e)))
}
