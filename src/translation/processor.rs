use async_trait::async_trait;

use super::ProviderReport;
use crate::error::ProviderError;
use crate::locale::Locale;

/// Something that can translate one text between two locales.
///
/// Results for identical input should be semantically stable but need not be
/// byte-identical across calls.
#[async_trait]
pub trait TranslationProcessor: Send + Sync {
    /// Short provider name for logs and summaries.
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        source: &Locale,
        target: &Locale,
    ) -> Result<String, ProviderError>;

    /// Call counters, when the provider keeps any.
    fn metrics(&self) -> Option<ProviderReport> {
        None
    }
}
