//! Provider call counters.
//!
//! Each processor owns its own counters so a summary reflects one run's
//! provider, not process-wide state.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ProviderMetrics {
    /// HTTP requests sent, retries included
    api_calls: AtomicUsize,

    /// HTTP requests that failed
    api_failures: AtomicUsize,

    /// Texts successfully translated
    translations: AtomicUsize,
}

impl ProviderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_translation(&self) {
        self.translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    pub fn translations(&self) -> usize {
        self.translations.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> ProviderReport {
        let calls = self.api_calls();
        let failures = self.api_failures();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        ProviderReport {
            api_calls: calls,
            api_failures: failures,
            api_success_rate,
            translations: self.translations(),
        }
    }
}

/// Snapshot of `ProviderMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderReport {
    pub api_calls: usize,
    pub api_failures: usize,
    /// Percentage (0-100)
    pub api_success_rate: f64,
    pub translations: usize,
}
