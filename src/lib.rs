//! Batch translation of Java resource-bundle `.properties` files.
//!
//! Given a source bundle (`messages.properties`) and some of its siblings
//! (`messages_fr.properties`, `messages_de_CH.properties`, ...), every key
//! that has a non-blank source value and a blank or missing target value is
//! sent to a translation provider. Bundles that translate cleanly are written
//! back; existing lines, comments and ordering are preserved.

pub mod config;
pub mod error;
pub mod locale;
pub mod notify;
pub mod orchestrator;
pub mod progress;
pub mod properties;
pub mod retry;
pub mod storage;
pub mod summary;
pub mod translation;

pub use error::{ProviderError, Result, TranslatorError};
pub use orchestrator::BatchOrchestrator;
pub use summary::{BatchSummary, RunOutcome};
