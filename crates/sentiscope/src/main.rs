use clap::Parser;
use sentiscope::analyze::Analyzer;
use sentiscope::cli::{Cli, Commands};
use sentiscope::config::AppConfig;
use sentiscope::context::AppContext;
use sentiscope::repl::run_repl;
use sentiscope::startup::spawn_loaders;
use sentiscope::view::{TerminalView, View};
use sentiscope_telemetry::BestEffort;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long a finishing batch run waits for in-flight telemetry
const TELEMETRY_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose);

    let config = AppConfig::load(&cli.global)?;
    let telemetry = BestEffort::new(config.telemetry_sink()?);
    let ctx = Arc::new(AppContext::new(
        telemetry,
        config.classifier.model_id(),
        config.corpus.clone(),
    ));

    tracing::info!(
        corpus = %config.corpus,
        backend = %config.classifier.backend,
        telemetry = ctx.telemetry.sink_name(),
        "Starting sentiscope"
    );

    let view = Arc::new(TerminalView::stdout());
    let _loaders = spawn_loaders(
        &ctx,
        config.corpus_source(),
        config.classifier.clone(),
        view.clone() as Arc<dyn View>,
    );

    let analyzer = Analyzer::new(ctx.clone());

    let run = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_repl(&analyzer, view.as_ref()).await,
        Commands::Analyze { count } => run_batch(&analyzer, view.as_ref(), count).await,
    };

    if tokio::time::timeout(TELEMETRY_GRACE, analyzer.flush_telemetry())
        .await
        .is_err()
    {
        tracing::warn!("Telemetry still pending at exit; dropping it");
    }

    run
}

/// Wait for both resources, then analyze `count` reviews
async fn run_batch(analyzer: &Analyzer, view: &dyn View, count: u32) -> anyhow::Result<()> {
    let ctx = analyzer.context();

    let corpus = ctx
        .corpus
        .wait()
        .await
        .map_err(|reason| anyhow::anyhow!("Corpus unavailable: {}", reason))?;
    tracing::debug!(reviews = corpus.len(), "Corpus ready");

    ctx.classifier
        .wait()
        .await
        .map_err(|reason| anyhow::anyhow!("Sentiment model unavailable: {}", reason))?;

    let mut failures = 0;
    for _ in 0..count {
        if !analyzer.trigger(view).await.is_done() {
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} analyses failed", failures, count);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "sentiscope=debug,sentiscope_corpus=debug,sentiscope_classifiers=debug,sentiscope_telemetry=debug"
    } else {
        "sentiscope=info,sentiscope_corpus=info,sentiscope_classifiers=info,sentiscope_telemetry=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
