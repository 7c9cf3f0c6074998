use chrono::{DateTime, Utc};
use serde::Serialize;

/// One property key to be translated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationEntry {
    key: String,
    source_text: String,
    requires_translation: bool,
    translated_text: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl TranslationEntry {
    /// Build an entry from the source value and the target's current value, if any.
    ///
    /// Translation is required when the source has text and the target has none.
    pub fn new(key: &str, source_text: &str, existing_target: Option<&str>) -> Self {
        let source_has_text = !source_text.trim().is_empty();
        let target_has_text = existing_target.is_some_and(|value| !value.trim().is_empty());

        Self {
            key: key.to_string(),
            source_text: source_text.to_string(),
            requires_translation: source_has_text && !target_has_text,
            translated_text: None,
            completed_at: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn requires_translation(&self) -> bool {
        self.requires_translation
    }

    pub fn translated_text(&self) -> Option<&str> {
        self.translated_text.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Still waiting for a translation.
    pub fn is_pending(&self) -> bool {
        self.requires_translation && self.completed_at.is_none()
    }

    /// Record a successful translation. Sets the text and the timestamp together.
    pub fn complete(&mut self, translated_text: String) {
        self.translated_text = Some(translated_text);
        self.completed_at = Some(Utc::now());
    }
}
