//! Translation work items and providers.
//!
//! - `entry`: one key to translate and its outcome
//! - `request`: a source/target bundle pair and its entries
//! - `process`: per-bundle run state (`NotStarted`, `Translated`, `Failed`) and the batch
//! - `processor`: the provider interface
//! - `google`: the free Google translate endpoint
//! - `metrics`: provider call counters

mod entry;
mod google;
mod metrics;
mod process;
mod processor;
mod request;

pub use entry::TranslationEntry;
pub use google::GoogleTranslateProcessor;
pub use metrics::{ProviderMetrics, ProviderReport};
pub use process::{Batch, ProcessState, TranslationProcess};
pub use processor::TranslationProcessor;
pub use request::TranslationRequest;
