use anyhow::{Context, Result};

use crate::locale::Locale;

pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translate.googleapis.com/translate_a/t";
pub const DEFAULT_TRANSLATE_CLIENT: &str = "dict-chrome-ex";

#[derive(Debug, Clone)]
pub struct Config {
    // Translation provider
    pub translate_api_url: String,
    pub translate_client: String,
    pub request_timeout_secs: u64,
    pub max_retry_attempts: u32,

    // Bundles without a locale suffix are assumed to be in this locale
    pub default_locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_locale = std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string());

        Ok(Self {
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_API_URL.to_string()),
            translate_client: std::env::var("TRANSLATE_CLIENT")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_CLIENT.to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_retry_attempts: std::env::var("MAX_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3u32)
                .max(1),

            default_locale: Locale::parse(&default_locale)
                .with_context(|| format!("DEFAULT_LOCALE '{}' is not a locale tag", default_locale))?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            translate_client: DEFAULT_TRANSLATE_CLIENT.to_string(),
            request_timeout_secs: 30,
            max_retry_attempts: 3,
            default_locale: Locale::english(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "TRANSLATE_API_URL",
        "TRANSLATE_CLIENT",
        "REQUEST_TIMEOUT_SECS",
        "MAX_RETRY_ATTEMPTS",
        "DEFAULT_LOCALE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.translate_api_url, DEFAULT_TRANSLATE_API_URL);
        assert_eq!(config.translate_client, "dict-chrome-ex");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retry_attempts, 3);
        assert_eq!(config.default_locale.to_string(), "en");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("TRANSLATE_API_URL", "http://localhost:9999/t");
        std::env::set_var("REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("MAX_RETRY_ATTEMPTS", "0");
        std::env::set_var("DEFAULT_LOCALE", "en_US");

        let config = Config::from_env().expect("Should load overrides");
        clear_env();

        assert_eq!(config.translate_api_url, "http://localhost:9999/t");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.max_retry_attempts, 1);
        assert_eq!(config.default_locale.to_string(), "en-US");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_numbers_fall_back() {
        clear_env();
        std::env::set_var("REQUEST_TIMEOUT_SECS", "soon");
        let config = Config::from_env().expect("Should load");
        clear_env();
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_invalid_default_locale() {
        clear_env();
        std::env::set_var("DEFAULT_LOCALE", "klingon");
        let result = Config::from_env();
        clear_env();

        let error = result.unwrap_err();
        assert!(error.to_string().contains("DEFAULT_LOCALE"));
    }

    #[test]
    fn test_default_matches_env_defaults() {
        let config = Config::default();
        assert_eq!(config.translate_api_url, DEFAULT_TRANSLATE_API_URL);
        assert_eq!(config.default_locale.language(), "en");
    }
}
