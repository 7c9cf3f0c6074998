//! Bundle file names → family root and locale.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::tag::{is_language, is_region, is_variant};
use super::Locale;
use crate::error::Result;
use crate::storage::BundleStorage;

pub const PROPERTIES_EXTENSION: &str = "properties";

/// One resource-bundle file of a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleFile {
    path: PathBuf,
    raw_name: String,
    family_root: String,
    locale: Locale,
    extension: Option<String>,
}

impl BundleFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as found on disk, e.g. `messages_fr.properties`.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// Name shared by every locale variant of the bundle, e.g. `messages`.
    pub fn family_root(&self) -> &str {
        &self.family_root
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Only `.properties` files take part in translation.
    pub fn is_valid(&self) -> bool {
        self.extension.as_deref() == Some(PROPERTIES_EXTENSION)
    }

    /// Same family, different file.
    pub fn is_related(&self, other: &BundleFile) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.family_root == other.family_root
            && self.raw_name != other.raw_name
    }

    /// Human readable label, e.g. `messages_fr_CA.properties (language=French, country=CA)`.
    pub fn display_label(&self) -> String {
        let mut label = format!(
            "{} (language={}",
            self.raw_name,
            self.locale.display_language()
        );
        if let Some(region) = self.locale.region() {
            label.push_str(&format!(", country={}", region));
        }
        if let Some(variant) = self.locale.variant() {
            label.push_str(&format!(", variant={}", variant));
        }
        label.push(')');
        label
    }

    /// Ask the storage layer to re-read this bundle's backing content.
    pub fn refresh(&self, storage: &dyn BundleStorage) -> Result<()> {
        storage.refresh(&self.path)
    }
}

/// Derives `BundleFile`s from file names.
///
/// Files without a recognisable locale suffix get `default_locale`.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    default_locale: Locale,
}

impl LocaleResolver {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> BundleFile {
        let path = path.as_ref();
        let raw_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (base_name, extension) = match raw_name.split_once('.') {
            Some((base, _)) => (
                base,
                raw_name.rsplit_once('.').map(|(_, ext)| ext.to_string()),
            ),
            None => (raw_name.as_str(), None),
        };

        let (family_root, locale) = self.split_base_name(base_name);
        debug!(
            "Resolved bundle {} -> root '{}', locale {}",
            raw_name, family_root, locale
        );

        BundleFile {
            path: path.to_path_buf(),
            family_root,
            locale,
            extension,
            raw_name,
        }
    }

    /// Split `<root>_<locale>` into its parts.
    ///
    /// Only trailing segments that form a locale are stripped. Besides a single
    /// tag (`fr`, `fr-CA`) the Java bundle form `fr_CA` and `fr_CA_VARIANT` is
    /// recognised. Anything else keeps the whole base name as the root.
    pub fn split_base_name(&self, base_name: &str) -> (String, Locale) {
        let segments: Vec<&str> = base_name.split('_').collect();
        let n = segments.len();
        let root_of = |keep: usize| segments[..keep].join("_");

        // <root>_<lang>_<REGION>_<variant>
        if n >= 4
            && is_variant(segments[n - 1])
            && is_region(segments[n - 2])
            && is_language(segments[n - 3])
        {
            let root = root_of(n - 3);
            if !root.is_empty() {
                if let Ok(locale) = Locale::parse(segments[n - 3]) {
                    return (
                        root,
                        locale
                            .with_region(segments[n - 2])
                            .with_variant(segments[n - 1]),
                    );
                }
            }
        }

        // <root>_<lang>_<REGION>
        if n >= 3 && is_region(segments[n - 1]) && is_language(segments[n - 2]) {
            let root = root_of(n - 2);
            if !root.is_empty() {
                if let Ok(locale) = Locale::parse(segments[n - 2]) {
                    return (root, locale.with_region(segments[n - 1]));
                }
            }
        }

        // <root>_<tag>
        if n >= 2 {
            let root = root_of(n - 1);
            if !root.is_empty() {
                if let Ok(locale) = Locale::parse(segments[n - 1]) {
                    return (root, locale);
                }
            }
        }

        (base_name.to_string(), self.default_locale.clone())
    }
}
