//! Sentiscope Corpus
//!
//! Loads a tab-separated review file once at startup and exposes uniform
//! random sampling over the non-blank `text` entries.
//!
//! Load failures never propagate to the user: [`load_or_empty`] logs them
//! and yields an empty corpus, which the analyze action reports as
//! "No reviews available".

pub mod corpus;
pub mod loader;
pub mod tsv;

pub use corpus::{Corpus, TEXT_COLUMN};
pub use loader::{load, load_or_empty, CorpusSource};
