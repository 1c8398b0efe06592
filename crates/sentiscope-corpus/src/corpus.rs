//! In-memory review corpus

use crate::tsv;
use rand::seq::SliceRandom;
use rand::Rng;
use sentiscope_core::{Error, Result, Review};

/// Name of the header column holding review text
pub const TEXT_COLUMN: &str = "text";

/// Read-only collection of reviews available for sampling
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    reviews: Vec<Review>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a corpus from review texts, dropping blank entries
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reviews = texts
            .into_iter()
            .map(|t| {
                let text: String = t.into();
                Review::new(text)
            })
            .filter(|r| !r.is_blank())
            .collect();
        Self { reviews }
    }

    /// Parse tab-separated text with a header row containing a `text` column
    pub fn parse_tsv(input: &str) -> Result<Self> {
        let mut rows = tsv::records(input).into_iter();

        let header = rows
            .next()
            .ok_or_else(|| Error::resource_load("TSV input has no header row"))?;

        let text_idx = tsv::column_index(&header, TEXT_COLUMN).ok_or_else(|| {
            Error::resource_load(format!(
                "TSV header has no '{}' column (found: {})",
                TEXT_COLUMN,
                header.join(", ")
            ))
        })?;

        let mut dropped = 0usize;
        let texts: Vec<String> = rows
            .filter_map(|mut row| {
                if text_idx < row.len() {
                    Some(row.swap_remove(text_idx))
                } else {
                    dropped += 1;
                    None
                }
            })
            .collect();

        let corpus = Self::from_texts(texts);
        tracing::debug!(
            reviews = corpus.len(),
            short_rows = dropped,
            "Parsed TSV corpus"
        );
        Ok(corpus)
    }

    /// Number of reviews
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Check if the corpus holds no reviews
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Iterate over all reviews in load order
    pub fn iter(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter()
    }

    /// Pick one review uniformly at random, or `None` if the corpus is empty
    pub fn sample_one(&self) -> Option<&Review> {
        self.sample_one_with(&mut rand::thread_rng())
    }

    /// Pick one review uniformly at random using the given generator
    pub fn sample_one_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Review> {
        self.reviews.choose(rng)
    }
}
