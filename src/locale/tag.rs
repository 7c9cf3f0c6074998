//! The `Locale` value type.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::LanguageRegistry;

/// A language with optional region and variant, e.g. `fr`, `fr-CA`, `de-CH-1996`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Locale {
    language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid locale tag '{0}'")]
pub struct LocaleParseError(pub String);

impl Locale {
    /// Parse a locale tag. Subtags may be separated by `-` or `_`.
    ///
    /// Case-insensitive like Java's `Locale`: the language (an ISO 639-1
    /// code) is lowercased, a region (two letters or three digits) is
    /// uppercased. The variant, 5-8 alphanumerics or a digit followed by three
    /// alphanumerics, is kept as written.
    pub fn parse(tag: &str) -> Result<Locale, LocaleParseError> {
        let invalid = || LocaleParseError(tag.to_string());
        let mut parts = tag.split(['-', '_']);

        let language = parts
            .next()
            .map(str::to_ascii_lowercase)
            .filter(|s| is_language(s))
            .ok_or_else(invalid)?;
        let mut locale = Locale {
            language,
            region: None,
            variant: None,
        };

        let mut next = parts.next();
        if let Some(region) = next.map(str::to_ascii_uppercase).filter(|s| is_region(s)) {
            locale.region = Some(region);
            next = parts.next();
        }
        if let Some(variant) = next {
            if !is_variant(variant) {
                return Err(invalid());
            }
            locale.variant = Some(variant.to_string());
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(locale)
    }

    /// `en`, the fallback used when nothing else is configured.
    pub fn english() -> Locale {
        Locale {
            language: "en".to_string(),
            region: None,
            variant: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// English name of the language, e.g. "French".
    pub fn display_language(&self) -> &'static str {
        LanguageRegistry::get()
            .get_by_code(&self.language)
            .map(|lang| lang.name)
            .unwrap_or("Unknown")
    }

    pub(crate) fn with_region(mut self, region: &str) -> Locale {
        self.region = Some(region.to_string());
        self
    }

    pub(crate) fn with_variant(mut self, variant: &str) -> Locale {
        self.variant = Some(variant.to_string());
        self
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "-{}", variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s)
    }
}

/// Known ISO 639-1 code, in any case.
pub(crate) fn is_language(subtag: &str) -> bool {
    LanguageRegistry::get().is_known(&subtag.to_ascii_lowercase())
}

pub(crate) fn is_region(subtag: &str) -> bool {
    match subtag.len() {
        2 => subtag.bytes().all(|b| b.is_ascii_uppercase()),
        3 => subtag.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

pub(crate) fn is_variant(subtag: &str) -> bool {
    let alphanumeric = subtag.bytes().all(|b| b.is_ascii_alphanumeric());
    match subtag.len() {
        5..=8 => alphanumeric,
        4 => alphanumeric && subtag.as_bytes()[0].is_ascii_digit(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("fr").expect("Should parse");
        assert_eq!(locale.language(), "fr");
        assert_eq!(locale.region(), None);
        assert_eq!(locale.variant(), None);
    }

    #[test]
    fn test_parse_language_and_region() {
        let locale = Locale::parse("pt-BR").expect("Should parse");
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));
        assert_eq!(locale.to_string(), "pt-BR");
    }

    #[test]
    fn test_parse_accepts_underscore_separator() {
        let locale = Locale::parse("en_US").expect("Should parse");
        assert_eq!(locale.to_string(), "en-US");
    }

    #[test]
    fn test_parse_numeric_region_and_variant() {
        let locale = Locale::parse("es-419").expect("Should parse");
        assert_eq!(locale.region(), Some("419"));

        let locale = Locale::parse("de-CH-1996").expect("Should parse");
        assert_eq!(locale.variant(), Some("1996"));

        let locale = Locale::parse("ca-valencia").expect("Should parse");
        assert_eq!(locale.region(), None);
        assert_eq!(locale.variant(), Some("valencia"));
    }

    #[test]
    fn test_parse_rejects_invalid_tags() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("xx").is_err());
        assert!(Locale::parse("french").is_err());
        assert!(Locale::parse("fr-").is_err());
        assert!(Locale::parse("fr-CA-POSIX-extra").is_err());
        assert!(Locale::parse("fr-c").is_err());
    }

    #[test]
    fn test_parse_normalizes_case() {
        let locale = Locale::parse("FR").expect("Should parse");
        assert_eq!(locale, Locale::parse("fr").unwrap());

        let locale = Locale::parse("Pt_br").expect("Should parse");
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));

        let locale = Locale::parse("de-ch-1996").expect("Should parse");
        assert_eq!(locale.to_string(), "de-CH-1996");
    }

    #[test]
    fn test_parse_error_message() {
        let error = Locale::parse("zz").unwrap_err();
        assert_eq!(error.to_string(), "Invalid locale tag 'zz'");
    }

    #[test]
    fn test_english_matches_parsed_tag() {
        assert_eq!(Locale::english(), Locale::parse("en").unwrap());
    }

    #[test]
    fn test_from_str() {
        let locale: Locale = "it".parse().expect("Should parse");
        assert_eq!(locale.language(), "it");
    }

    #[test]
    fn test_display_language() {
        assert_eq!(Locale::parse("de").unwrap().display_language(), "German");
        assert_eq!(Locale::parse("ja-JP").unwrap().display_language(), "Japanese");
    }

    #[test]
    fn test_builders() {
        let locale = Locale::parse("fr").unwrap().with_region("CA").with_variant("POSIX");
        assert_eq!(locale.to_string(), "fr-CA-POSIX");
    }

    #[test]
    fn test_subtag_predicates() {
        assert!(is_region("US"));
        assert!(is_region("419"));
        assert!(!is_region("us"));
        assert!(!is_region("USA"));
        assert!(is_variant("POSIX"));
        assert!(is_variant("1901"));
        assert!(!is_variant("abcd"));
        assert!(!is_variant("toolongvariant"));
    }

    #[test]
    fn test_serialize_skips_missing_parts() {
        let json = serde_json::to_string(&Locale::parse("fr").unwrap()).unwrap();
        assert_eq!(json, r#"{"language":"fr"}"#);
    }
}
