use serde::Serialize;

use crate::translation::ProviderReport;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// No selected bundle had a pending entry; the provider was never called.
    NothingToTranslate,
    /// Every included request was attempted.
    Completed,
    /// Stopped early; requests translated before the stop are still flushable.
    Cancelled,
}

/// End-of-run report, returned even when some or all bundles failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub outcome: RunOutcome,
    /// Bundles that entered the batch (had pending entries)
    pub bundles_processed: usize,
    pub bundles_translated: usize,
    pub bundles_failed: usize,
    pub bundles_not_started: usize,
    pub bundles_flushed: usize,
    pub entries_translated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderReport>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.bundles_failed > 0
    }

    /// One-line message for notifications.
    pub fn message(&self) -> String {
        match self.outcome {
            RunOutcome::NothingToTranslate => "No translation to process!".to_string(),
            RunOutcome::Completed | RunOutcome::Cancelled => {
                let mut message = format!(
                    "Translation {}. Property files processed: {}. Request entries translated: {}. Files written: {}.",
                    if self.outcome == RunOutcome::Cancelled {
                        "cancelled"
                    } else {
                        "completed"
                    },
                    self.bundles_processed,
                    self.entries_translated,
                    self.bundles_flushed,
                );
                if self.bundles_failed > 0 {
                    message.push_str(&format!(" Failed: {}.", self.bundles_failed));
                }
                message
            }
        }
    }
}
