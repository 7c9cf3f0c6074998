use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use bundle_translator::config::Config;
use bundle_translator::locale::LocaleResolver;
use bundle_translator::progress::{CancellationFlag, LoggingProgress};
use bundle_translator::storage::FsBundleStore;
use bundle_translator::translation::GoogleTranslateProcessor;
use bundle_translator::BatchOrchestrator;

const USAGE: &str = "Usage: bundle-translator <source.properties> [target.properties ...]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bundle_translator=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let targets: Vec<String> = args.collect();

    let config = Config::from_env()?;
    info!(
        "Using {} (default locale {})",
        config.translate_api_url, config.default_locale
    );

    let store = Arc::new(FsBundleStore::new());
    let processor = Arc::new(GoogleTranslateProcessor::new(&config)?);
    let mut orchestrator = BatchOrchestrator::new(
        LocaleResolver::new(config.default_locale.clone()),
        store.clone(),
        store,
        processor,
    );

    orchestrator
        .discover(&PathBuf::from(&source))
        .with_context(|| format!("Cannot load bundle family of {}", source))?;
    if targets.is_empty() {
        orchestrator.select_all_targets();
    } else {
        orchestrator.select_targets(&targets);
        if orchestrator.selected_targets().len() < targets.len() {
            warn!("Some requested targets are not part of the bundle family and were ignored");
        }
    }

    let cancellation = CancellationFlag::new();
    let progress = LoggingProgress::new(cancellation.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current entry");
            cancellation.cancel();
        }
    });

    let run = tokio::spawn(async move { orchestrator.translate_selected(&progress).await });
    let summary = run.await.context("Translation task panicked")??;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
