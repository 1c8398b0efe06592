//! Background resource loading
//!
//! The corpus and the classifier load concurrently; each settles its own
//! gate in the shared [`AppContext`]. Neither load blocks the prompt.

use crate::analyze::MODEL_LOAD_FAILED;
use crate::context::AppContext;
use crate::view::View;
use sentiscope_classifiers::{load_classifier, ClassifierConfig};
use sentiscope_corpus::CorpusSource;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Start both loaders
pub fn spawn_loaders(
    ctx: &Arc<AppContext>,
    source: CorpusSource,
    classifier: ClassifierConfig,
    view: Arc<dyn View>,
) -> (JoinHandle<()>, JoinHandle<()>) {
    let corpus_task = tokio::spawn(load_corpus(ctx.clone(), source));
    let classifier_task = tokio::spawn(load_model(ctx.clone(), classifier, view));
    (corpus_task, classifier_task)
}

/// Load the corpus; failures leave an empty corpus behind
pub async fn load_corpus(ctx: Arc<AppContext>, source: CorpusSource) {
    let corpus = sentiscope_corpus::load_or_empty(&source).await;
    metrics::gauge!("sentiscope_corpus_reviews").set(corpus.len() as f64);
    ctx.corpus.open(Arc::new(corpus));
}

/// Initialize the classifier and open its gate, or report the failure
pub async fn load_model(ctx: Arc<AppContext>, config: ClassifierConfig, view: Arc<dyn View>) {
    match load_classifier(&config).await {
        Ok(classifier) => {
            tracing::info!(classifier = classifier.name(), "Sentiment model ready");
            ctx.classifier.open(classifier);
        }
        Err(e) => {
            tracing::error!(error = %e, model = %config.model, "Model load error");
            ctx.classifier.fail(e.to_string());
            view.show_error(MODEL_LOAD_FAILED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::TerminalView;
    use sentiscope_classifiers::Backend;
    use sentiscope_telemetry::{BestEffort, NoopSink};
    use std::io::Write;

    fn context() -> Arc<AppContext> {
        Arc::new(AppContext::new(
            BestEffort::new(Arc::new(NoopSink)),
            "sentiment-lexicon",
            "reviews_test.tsv",
        ))
    }

    #[tokio::test]
    async fn test_loaders_open_both_gates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id\ttext\n1\tGreat value\n2\tStopped working\n").unwrap();

        let ctx = context();
        let config = ClassifierConfig {
            backend: Backend::Lexicon,
            ..Default::default()
        };
        let view: Arc<dyn View> = Arc::new(TerminalView::new(Vec::new()));

        let (corpus, classifier) =
            spawn_loaders(&ctx, CorpusSource::from_path(file.path()), config, view);
        corpus.await.unwrap();
        classifier.await.unwrap();

        assert!(ctx.readiness().is_ready());
        assert_eq!(ctx.corpus.get().unwrap().len(), 2);
        assert!(ctx.status_line().starts_with("corpus: 2 reviews"));
    }

    #[tokio::test]
    async fn test_missing_corpus_opens_empty() {
        let ctx = context();
        load_corpus(ctx.clone(), CorpusSource::from_path("/nonexistent/reviews.tsv")).await;
        assert!(ctx.corpus.get().unwrap().is_empty());
    }
}
