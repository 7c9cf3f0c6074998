//! Locale handling for resource bundles.
//!
//! Bundle files follow the Java naming convention `<root>[_<locale>].<ext>`.
//! This module parses the locale suffix, groups files into families sharing
//! the same root name, and knows the ISO 639-1 language table used to decide
//! whether a suffix is a locale at all.
//!
//! # Architecture
//!
//! - `registry`: ISO 639-1 language codes and their English names
//! - `tag`: the `Locale` value type (language, region, variant)
//! - `resolver`: file name → `BundleFile`, family membership
//!
//! # Example
//!
//! ```rust,ignore
//! use bundle_translator::locale::{Locale, LocaleResolver};
//!
//! let resolver = LocaleResolver::new(Locale::parse("en")?);
//! let bundle = resolver.resolve("i18n/messages_fr_CA.properties");
//! assert_eq!(bundle.family_root(), "messages");
//! assert_eq!(bundle.locale().to_string(), "fr-CA");
//! ```

mod registry;
mod resolver;
mod tag;

pub use registry::{LanguageInfo, LanguageRegistry};
pub use resolver::{BundleFile, LocaleResolver, PROPERTIES_EXTENSION};
pub use tag::{Locale, LocaleParseError};
