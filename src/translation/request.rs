use crate::error::{Result, TranslatorError};
use crate::locale::{BundleFile, Locale};
use crate::properties::PropertiesDocument;

use super::TranslationEntry;

/// A source bundle paired with one target bundle.
///
/// Entries follow the source file's key order. The target document is kept
/// so translated values can be merged back without re-reading the file.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    source: BundleFile,
    target: BundleFile,
    entries: Vec<TranslationEntry>,
    target_document: PropertiesDocument,
}

impl TranslationRequest {
    /// Fails with `LocaleConflict` when both bundles resolve to the same locale.
    pub fn new(
        source: &BundleFile,
        source_text: &str,
        target: &BundleFile,
        target_text: &str,
    ) -> Result<Self> {
        if source.locale() == target.locale() {
            return Err(TranslatorError::LocaleConflict(source.locale().clone()));
        }

        let source_document = PropertiesDocument::parse(source_text);
        let target_document = PropertiesDocument::parse(target_text);

        let entries = source_document
            .entries()
            .into_iter()
            .map(|(key, value)| TranslationEntry::new(key, value, target_document.get(key)))
            .collect();

        Ok(Self {
            source: source.clone(),
            target: target.clone(),
            entries,
            target_document,
        })
    }

    pub fn source(&self) -> &BundleFile {
        &self.source
    }

    pub fn target(&self) -> &BundleFile {
        &self.target
    }

    pub fn source_locale(&self) -> &Locale {
        self.source.locale()
    }

    pub fn target_locale(&self) -> &Locale {
        self.target.locale()
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [TranslationEntry] {
        &mut self.entries
    }

    /// Entries still waiting for a translation.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_completed()).count()
    }

    /// Target content with every completed translation merged in.
    ///
    /// Existing keys keep their position; keys missing from the target are
    /// appended in source order. Everything else renders unchanged.
    pub fn reconciled_content(&self) -> String {
        let mut document = self.target_document.clone();
        for entry in &self.entries {
            if let Some(text) = entry.translated_text().filter(|_| entry.is_completed()) {
                document.set(entry.key(), text);
            }
        }
        document.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleResolver;

    fn bundles(source: &str, target: &str) -> (BundleFile, BundleFile) {
        let resolver = LocaleResolver::new(Locale::parse("en").unwrap());
        (resolver.resolve(source), resolver.resolve(target))
    }

    #[test]
    fn test_entries_follow_source_order() {
        let (source, target) = bundles("app.properties", "app_fr.properties");
        let request = TranslationRequest::new(
            &source,
            "b=Bee\na=Aye\nc=Sea\n",
            &target,
            "a=Ah\n",
        )
        .unwrap();

        let keys: Vec<&str> = request.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(request.pending_count(), 2);
        assert_eq!(request.source_locale().to_string(), "en");
        assert_eq!(request.target_locale().to_string(), "fr");
    }

    #[test]
    fn test_same_locale_rejected() {
        let (source, target) = bundles("app.properties", "app_en.properties");
        let result = TranslationRequest::new(&source, "a=1\n", &target, "");
        assert!(matches!(result, Err(TranslatorError::LocaleConflict(_))));
    }

    #[test]
    fn test_fully_translated_target_has_no_pending() {
        let (source, target) = bundles("app.properties", "app_de.properties");
        let request = TranslationRequest::new(
            &source,
            "greeting=Hello\nfarewell=Bye\n",
            &target,
            "greeting=Hallo\nfarewell=Tschüss\n",
        )
        .unwrap();
        assert_eq!(request.pending_count(), 0);
        assert_eq!(request.completed_count(), 0);
    }

    #[test]
    fn test_reconciled_content_merges_completed_entries() {
        let (source, target) = bundles("app.properties", "app_fr.properties");
        let mut request = TranslationRequest::new(
            &source,
            "greeting=Hello\nfarewell=Bye\ntitle=Title\nextra=More\n",
            &target,
            "# French\ngreeting=\nfarewell=Au revoir\ntitle=\n",
        )
        .unwrap();

        for entry in request.entries_mut() {
            let key = entry.key().to_string();
            match key.as_str() {
                "greeting" => entry.complete("Bonjour".to_string()),
                "extra" => entry.complete("Plus".to_string()),
                _ => {}
            }
        }

        assert_eq!(request.completed_count(), 2);
        assert_eq!(request.pending_count(), 1);
        assert_eq!(
            request.reconciled_content(),
            "# French\ngreeting=Bonjour\nfarewell=Au revoir\ntitle=\nextra=Plus\n"
        );
    }

    #[test]
    fn test_reconciled_content_without_completions_is_unchanged() {
        let (source, target) = bundles("app.properties", "app_fr.properties");
        let target_text = "greeting = \n# trailing comment";
        let request =
            TranslationRequest::new(&source, "greeting=Hello\n", &target, target_text).unwrap();
        assert_eq!(request.reconciled_content(), target_text);
    }
}
