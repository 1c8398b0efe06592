//! Corpus loading and sampling tests

use proptest::prelude::*;
use sentiscope_corpus::{load, load_or_empty, Corpus, CorpusSource};
use sentiscope_core::Error;
use std::io::Write;

fn write_tsv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_load_from_file() {
    let file = write_tsv(
        "sentiment\ttext\n\
         1\tBattery lasts all day, love it\n\
         0\tStopped working after a week\n\
         1\t   \n",
    );

    let corpus = load(&CorpusSource::from_path(file.path())).await.unwrap();
    assert_eq!(corpus.len(), 2);
}

#[tokio::test]
async fn test_load_file_with_byte_order_mark() {
    let file = write_tsv("\u{FEFF}text\tid\nGreat phone\t1\nCase cracked\t2\n");

    let corpus = load_or_empty(&CorpusSource::from_path(file.path())).await;
    assert_eq!(corpus.len(), 2);
    assert!(corpus.iter().any(|r| r.as_str() == "Great phone"));
}

#[tokio::test]
async fn test_missing_file_is_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CorpusSource::from_path(dir.path().join("absent.tsv"));

    let err = load(&source).await.unwrap_err();
    assert!(matches!(err, Error::ResourceLoad(_)));
}

#[tokio::test]
async fn test_load_or_empty_swallows_failures() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = load_or_empty(&CorpusSource::from_path(dir.path().join("absent.tsv"))).await;
    assert!(corpus.is_empty());

    let file = write_tsv("id\tbody\n1\tno text column\n");
    let corpus = load_or_empty(&CorpusSource::from_path(file.path())).await;
    assert!(corpus.is_empty());
}

#[tokio::test]
async fn test_unreachable_url_is_resource_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = CorpusSource::from_url(format!("http://{}/reviews_test.tsv", addr));
    let err = load(&source).await.unwrap_err();
    assert!(matches!(err, Error::ResourceLoad(_)));
}

proptest! {
    #[test]
    fn sample_one_returns_parsed_non_blank_review(
        texts in prop::collection::vec("[a-zA-Z ]{0,24}", 1..32),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;

        let mut tsv = String::from("id\ttext\n");
        for (i, text) in texts.iter().enumerate() {
            tsv.push_str(&format!("{}\t{}\n", i, text));
        }

        let corpus = Corpus::parse_tsv(&tsv).unwrap();
        let non_blank: Vec<&String> = texts.iter().filter(|t| !t.trim().is_empty()).collect();
        prop_assert_eq!(corpus.len(), non_blank.len());

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        match corpus.sample_one_with(&mut rng) {
            Some(review) => {
                prop_assert!(!review.as_str().trim().is_empty());
                prop_assert!(texts.iter().any(|t| t == review.as_str()));
            }
            None => prop_assert!(non_blank.is_empty()),
        }
    }
}
