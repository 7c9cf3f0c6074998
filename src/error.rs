use std::path::PathBuf;
use thiserror::Error;

use crate::locale::Locale;

pub type Result<T, E = TranslatorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Translation provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Storage error for '{}': {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source and target bundles share the same locale '{0}'")]
    LocaleConflict(Locale),
}

impl TranslatorError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslatorError::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single call to a translation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to reach translation provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Translation provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed translation provider response: {0}")]
    Decode(String),

    #[error("Translation provider response contained no sentences")]
    EmptyResponse,
}

impl ProviderError {
    /// Rate limiting, server errors and transport failures are worth another attempt.
    /// Other 4xx responses and bad payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Decode(_) | ProviderError::EmptyResponse => false,
        }
    }
}
