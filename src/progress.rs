//! Progress reporting and cooperative cancellation for a batch run.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters pushed to the progress indicator after every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub entries_total: usize,
    pub entries_remaining: usize,
    pub bundles_total: usize,
}

impl ProgressSnapshot {
    /// Share of entries done, `None` when there is nothing to translate.
    pub fn fraction(&self) -> Option<f64> {
        if self.entries_total == 0 {
            return None;
        }
        let done = self.entries_total.saturating_sub(self.entries_remaining);
        Some(done as f64 / self.entries_total as f64)
    }
}

pub trait ProgressIndicator: Send + Sync {
    fn set_fraction(&self, fraction: f64);

    fn set_text(&self, text: &str);

    fn is_cancelled(&self) -> bool;

    fn report(&self, snapshot: &ProgressSnapshot) {
        if let Some(fraction) = snapshot.fraction() {
            self.set_fraction(fraction);
        }
        self.set_text(&format!(
            "Remaining entries to translate: {} of {} across {} bundle(s)",
            snapshot.entries_remaining, snapshot.entries_total, snapshot.bundles_total
        ));
    }
}

/// Shared cancellation switch. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress indicator that logs through tracing.
#[derive(Debug, Clone, Default)]
pub struct LoggingProgress {
    cancellation: CancellationFlag,
}

impl LoggingProgress {
    pub fn new(cancellation: CancellationFlag) -> Self {
        Self { cancellation }
    }
}

impl ProgressIndicator for LoggingProgress {
    fn set_fraction(&self, fraction: f64) {
        info!("Progress: {:.0}%", fraction * 100.0);
    }

    fn set_text(&self, text: &str) {
        info!("{}", text);
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        fractions: Mutex<Vec<f64>>,
        texts: Mutex<Vec<String>>,
    }

    impl ProgressIndicator for Recording {
        fn set_fraction(&self, fraction: f64) {
            self.fractions.lock().unwrap().push(fraction);
        }

        fn set_text(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }

        fn is_cancelled(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_fraction() {
        let snapshot = ProgressSnapshot {
            entries_total: 4,
            entries_remaining: 1,
            bundles_total: 2,
        };
        assert_eq!(snapshot.fraction(), Some(0.75));
    }

    #[test]
    fn test_fraction_undefined_for_zero_total() {
        let snapshot = ProgressSnapshot {
            entries_total: 0,
            entries_remaining: 0,
            bundles_total: 0,
        };
        assert_eq!(snapshot.fraction(), None);
    }

    #[test]
    fn test_report_pushes_fraction_and_text() {
        let progress = Recording::default();
        progress.report(&ProgressSnapshot {
            entries_total: 2,
            entries_remaining: 1,
            bundles_total: 1,
        });

        assert_eq!(*progress.fractions.lock().unwrap(), vec![0.5]);
        let texts = progress.texts.lock().unwrap();
        assert!(texts[0].contains("1 of 2"));
    }

    #[test]
    fn test_report_skips_fraction_for_zero_total() {
        let progress = Recording::default();
        progress.report(&ProgressSnapshot {
            entries_total: 0,
            entries_remaining: 0,
            bundles_total: 0,
        });
        assert!(progress.fractions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cancellation_flag_shared_between_clones() {
        let flag = CancellationFlag::new();
        let progress = LoggingProgress::new(flag.clone());
        assert!(!progress.is_cancelled());

        flag.cancel();
        assert!(progress.is_cancelled());
    }
}
