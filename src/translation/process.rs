use serde::Serialize;

use super::TranslationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    NotStarted,
    Translated,
    Failed,
}

/// Per-target-bundle state of one batch run.
///
/// Only a `Translated` process carries content and may be flushed.
#[derive(Debug, Clone)]
pub struct TranslationProcess {
    request: TranslationRequest,
    state: ProcessState,
    content: Option<String>,
    failure: Option<String>,
    flushed: bool,
}

impl TranslationProcess {
    pub fn new(request: TranslationRequest) -> Self {
        Self {
            request,
            state: ProcessState::NotStarted,
            content: None,
            failure: None,
            flushed: false,
        }
    }

    pub fn request(&self) -> &TranslationRequest {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut TranslationRequest {
        &mut self.request
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Reconciled target content, present once translated.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    pub fn is_flushable(&self) -> bool {
        self.state == ProcessState::Translated && !self.flushed && self.content.is_some()
    }

    /// Move to `Translated` if at least one entry was translated.
    ///
    /// Returns whether the transition happened.
    pub(crate) fn mark_translated(&mut self) -> bool {
        if self.state != ProcessState::NotStarted || self.request.completed_count() == 0 {
            return false;
        }
        self.content = Some(self.request.reconciled_content());
        self.state = ProcessState::Translated;
        true
    }

    pub(crate) fn mark_failed(&mut self, reason: impl Into<String>) {
        self.state = ProcessState::Failed;
        self.content = None;
        self.failure = Some(reason.into());
    }

    pub(crate) fn mark_flushed(&mut self) {
        self.flushed = true;
    }
}

/// All processes of one orchestration run, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    processes: Vec<TranslationProcess>,
    rejected: Vec<String>,
}

impl Batch {
    pub fn new(processes: Vec<TranslationProcess>) -> Self {
        Self {
            processes,
            rejected: Vec::new(),
        }
    }

    pub fn processes(&self) -> &[TranslationProcess] {
        &self.processes
    }

    pub(crate) fn processes_mut(&mut self) -> &mut [TranslationProcess] {
        &mut self.processes
    }

    /// Targets that could not be turned into a request (unreadable, same locale as source).
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub(crate) fn reject(&mut self, bundle_name: &str) {
        self.rejected.push(bundle_name.to_string());
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.processes
            .iter()
            .map(|process| process.request().pending_count())
            .sum()
    }

    pub fn translated_entry_count(&self) -> usize {
        self.processes
            .iter()
            .map(|process| process.request().completed_count())
            .sum()
    }

    pub fn count_in_state(&self, state: ProcessState) -> usize {
        self.processes
            .iter()
            .filter(|process| process.state() == state)
            .count()
    }

    pub fn flushed_count(&self) -> usize {
        self.processes.iter().filter(|p| p.is_flushed()).count()
    }
}
