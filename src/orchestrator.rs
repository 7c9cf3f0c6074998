//! Batch orchestration.
//!
//! One orchestrator drives one bundle family: pick a source bundle, select
//! target bundles, then `run` translates every pending entry and `flush`
//! writes the bundles that translated cleanly. `run` and `flush` take
//! `&mut self`, so a second run can't start while one is in flight.
//!
//! Processing is strictly sequential: requests in selection order, entries in
//! source key order. A provider failure aborts only the request it happened
//! in. Cancellation is checked before every provider call.
//!
//! Flush replaces the whole target file with the reconciled content. Edits
//! made to a target between `run` and `flush` are overwritten.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, TranslatorError};
use crate::locale::{BundleFile, LocaleResolver};
use crate::notify::{Notifier, Severity, TracingNotifier};
use crate::progress::{ProgressIndicator, ProgressSnapshot};
use crate::storage::{BundleDiscovery, BundleStorage};
use crate::summary::{BatchSummary, RunOutcome};
use crate::translation::{
    Batch, ProcessState, TranslationProcess, TranslationProcessor, TranslationRequest,
};

pub struct BatchOrchestrator {
    resolver: LocaleResolver,
    storage: Arc<dyn BundleStorage>,
    discovery: Arc<dyn BundleDiscovery>,
    processor: Arc<dyn TranslationProcessor>,
    notifier: Arc<dyn Notifier>,

    bundles: Vec<BundleFile>,
    source: Option<BundleFile>,
    targets: Vec<BundleFile>,
    selected: Vec<String>,

    batch: Batch,
    outcome: Option<RunOutcome>,
}

impl BatchOrchestrator {
    pub fn new(
        resolver: LocaleResolver,
        storage: Arc<dyn BundleStorage>,
        discovery: Arc<dyn BundleDiscovery>,
        processor: Arc<dyn TranslationProcessor>,
    ) -> Self {
        Self {
            resolver,
            storage,
            discovery,
            processor,
            notifier: Arc::new(TracingNotifier),
            bundles: Vec::new(),
            source: None,
            targets: Vec::new(),
            selected: Vec::new(),
            batch: Batch::default(),
            outcome: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // ==================== Discovery & Selection ====================

    /// Collect the family of `anchor` from its directory and make `anchor` the source.
    pub fn discover(&mut self, anchor: &Path) -> Result<&[BundleFile]> {
        let anchor = self.resolver.resolve(anchor);
        if !anchor.is_valid() {
            return Err(TranslatorError::InvalidSelection(format!(
                "'{}' is not a .properties bundle",
                anchor.raw_name()
            )));
        }

        let mut bundles: Vec<BundleFile> = self
            .discovery
            .list_sibling_files(anchor.path())?
            .iter()
            .map(|path| self.resolver.resolve(path))
            .filter(|bundle| bundle.is_related(&anchor))
            .collect();
        bundles.push(anchor.clone());
        bundles.sort_by(|a, b| a.raw_name().cmp(b.raw_name()));

        info!(
            "Discovered {} bundle(s) in family '{}'",
            bundles.len(),
            anchor.family_root()
        );
        for bundle in &bundles {
            debug!("  {}", bundle.display_label());
        }

        self.bundles = bundles;
        self.select_source(anchor.raw_name())?;
        Ok(&self.bundles)
    }

    /// Make `name` the source bundle. Every other discovered bundle becomes a
    /// possible target; the target selection is cleared.
    pub fn select_source(&mut self, name: &str) -> Result<()> {
        let source = self
            .bundles
            .iter()
            .find(|bundle| bundle.raw_name() == name)
            .cloned()
            .ok_or_else(|| {
                TranslatorError::InvalidSelection(format!("Cannot find bundle '{}'", name))
            })?;

        self.targets = self
            .bundles
            .iter()
            .filter(|bundle| bundle.raw_name() != name)
            .cloned()
            .collect();
        self.selected.clear();
        info!(
            "Source bundle: {} ({} possible target(s))",
            source.display_label(),
            self.targets.len()
        );
        self.source = Some(source);
        Ok(())
    }

    /// Add targets to the selection, keeping selection order. Unknown names are ignored.
    pub fn select_targets<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let known = self.targets.iter().any(|t| t.raw_name() == name);
            if !known {
                debug!("Ignoring selection of unknown target '{}'", name);
                continue;
            }
            if !self.selected.iter().any(|s| s == name) {
                self.selected.push(name.to_string());
            }
        }
    }

    pub fn deselect_targets<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.selected.retain(|s| s != name);
        }
    }

    pub fn select_all_targets(&mut self) {
        let names: Vec<String> = self
            .targets
            .iter()
            .map(|t| t.raw_name().to_string())
            .collect();
        self.select_targets(names);
    }

    pub fn deselect_all_targets(&mut self) {
        self.selected.clear();
    }

    pub fn bundles(&self) -> &[BundleFile] {
        &self.bundles
    }

    pub fn source(&self) -> Option<&BundleFile> {
        self.source.as_ref()
    }

    pub fn targets(&self) -> &[BundleFile] {
        &self.targets
    }

    pub fn selected_targets(&self) -> Vec<&BundleFile> {
        self.selected
            .iter()
            .filter_map(|name| self.targets.iter().find(|t| t.raw_name() == name))
            .collect()
    }

    // ==================== Run ====================

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    fn build_batch(&self) -> Result<Batch> {
        let source = self.source.as_ref().ok_or_else(|| {
            TranslatorError::InvalidSelection("No source bundle selected".to_string())
        })?;
        let source_text = self.storage.read_text(source.path())?;

        let mut processes = Vec::new();
        let mut rejected = Vec::new();
        for target in self.selected_targets() {
            let prepared = self
                .storage
                .read_text(target.path())
                .and_then(|text| TranslationRequest::new(source, &source_text, target, &text));

            match prepared {
                Ok(request) if request.pending_count() == 0 => {
                    debug!("{} is already fully translated", target.raw_name());
                }
                Ok(request) => processes.push(TranslationProcess::new(request)),
                Err(error) => {
                    self.notifier.notify(
                        &format!("Cannot prepare translation of {}: {}", target.raw_name(), error),
                        Severity::Error,
                    );
                    rejected.push(target.raw_name().to_string());
                }
            }
        }

        let mut batch = Batch::new(processes);
        for name in rejected {
            batch.reject(&name);
        }
        Ok(batch)
    }

    /// Translate every pending entry of the selected targets.
    ///
    /// Provider failures mark their request `Failed` and never abort the batch.
    /// Errors are returned only when the run can't start (no source, unreadable source).
    pub async fn run(&mut self, progress: &dyn ProgressIndicator) -> Result<RunOutcome> {
        self.outcome = None;
        // A run that can't start must not leave the previous batch flushable.
        self.batch = Batch::default();
        self.batch = self.build_batch()?;

        progress.set_fraction(0.0);
        progress.set_text("Computing number of entries to translate...");

        let entries_total = self.batch.pending_count();
        let bundles_total = self.batch.len();
        if entries_total == 0 {
            self.notifier
                .notify("No translation to process!", Severity::Info);
            self.outcome = Some(RunOutcome::NothingToTranslate);
            return Ok(RunOutcome::NothingToTranslate);
        }

        info!(
            "Translating {} entries across {} bundle(s) with {}",
            entries_total,
            bundles_total,
            self.processor.name()
        );

        let mut remaining = entries_total;
        let mut cancelled = false;

        for process in self.batch.processes_mut() {
            let target_name = process.request().target().raw_name().to_string();
            let source_locale = process.request().source_locale().clone();
            let target_locale = process.request().target_locale().clone();
            let pending: Vec<usize> = process
                .request()
                .entries()
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.is_pending())
                .map(|(index, _)| index)
                .collect();

            let mut failure = None;
            for (done, &index) in pending.iter().enumerate() {
                if progress.is_cancelled() {
                    cancelled = true;
                    break;
                }

                let text = process.request().entries()[index].source_text().to_string();
                match self
                    .processor
                    .translate(&text, &source_locale, &target_locale)
                    .await
                {
                    Ok(translated) => {
                        process.request_mut().entries_mut()[index].complete(translated);
                        remaining -= 1;
                    }
                    Err(error) => {
                        // The rest of this request is abandoned.
                        remaining -= pending.len() - done;
                        failure = Some(error);
                    }
                }

                progress.report(&ProgressSnapshot {
                    entries_total,
                    entries_remaining: remaining,
                    bundles_total,
                });
                if failure.is_some() {
                    break;
                }
            }

            if cancelled {
                info!("Translation cancelled while processing {}", target_name);
                break;
            }

            match failure {
                Some(error) => {
                    let message =
                        format!("Translation of {} aborted due to: {}", target_name, error);
                    process.mark_failed(error.to_string());
                    self.notifier.notify(&message, Severity::Error);
                }
                None => {
                    if process.mark_translated() {
                        info!(
                            "Translated {} entries of {}",
                            process.request().completed_count(),
                            target_name
                        );
                    }
                }
            }
        }

        let outcome = if cancelled {
            progress.set_text("Translation cancelled.");
            RunOutcome::Cancelled
        } else {
            progress.set_fraction(1.0);
            progress.set_text("Translation completed.");
            RunOutcome::Completed
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    // ==================== Flush ====================

    /// Write every translated, not yet written bundle, then refresh the family.
    ///
    /// A failed write marks that bundle `Failed`; the others are still written.
    /// Returns the number of bundles written.
    pub fn flush(&mut self) -> usize {
        let mut written = 0;

        for process in self.batch.processes_mut() {
            if !process.is_flushable() {
                continue;
            }
            let path = process.request().target().path().to_path_buf();
            let name = process.request().target().raw_name().to_string();
            let result = match process.content() {
                Some(content) => self.storage.write_text(&path, content),
                None => continue,
            };

            match result {
                Ok(()) => {
                    process.mark_flushed();
                    written += 1;
                    info!("Saved translations to {}", name);
                }
                Err(error) => {
                    let message = format!("Cannot save {} due to: {}", name, error);
                    process.mark_failed(error.to_string());
                    self.notifier.notify(&message, Severity::Error);
                }
            }
        }

        self.refresh_all();
        written
    }

    fn refresh_all(&self) {
        for bundle in self.source.iter().chain(self.targets.iter()) {
            if let Err(error) = bundle.refresh(self.storage.as_ref()) {
                warn!("Cannot refresh {}: {}", bundle.raw_name(), error);
            }
        }
    }

    // ==================== Summary ====================

    /// `run`, then `flush`, then notify and return the summary.
    pub async fn translate_selected(
        &mut self,
        progress: &dyn ProgressIndicator,
    ) -> Result<BatchSummary> {
        let outcome = self.run(progress).await?;
        if outcome == RunOutcome::NothingToTranslate {
            return Ok(self.summary());
        }

        self.flush();
        let summary = self.summary();
        let severity = if summary.has_failures() {
            Severity::Warning
        } else {
            Severity::Info
        };
        self.notifier.notify(&summary.message(), severity);
        Ok(summary)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            outcome: self.outcome.unwrap_or(RunOutcome::NothingToTranslate),
            bundles_processed: self.batch.len(),
            bundles_translated: self.batch.count_in_state(ProcessState::Translated),
            bundles_failed: self.batch.count_in_state(ProcessState::Failed)
                + self.batch.rejected().len(),
            bundles_not_started: self.batch.count_in_state(ProcessState::NotStarted),
            bundles_flushed: self.batch.flushed_count(),
            entries_translated: self.batch.translated_entry_count(),
            provider: self.processor.metrics(),
        }
    }
}
