//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//! - `STOREFRONT_NAME` - Store name shown in the page header (default: Lustre Fine Jewelry)
//! - `STOREFRONT_DATA_DIR` - Directory holding `storage.json` (default: .lustre)
//! - `STOREFRONT_PAGE_PATH` - Where the assembled page is written (default: `<data_dir>/index.html`)
//! - `STOREFRONT_CATALOG_PATH` - JSON seed overriding the built-in catalog
//! - `STOREFRONT_SEARCH_DEBOUNCE_MS` - Quiet period before a typed search runs (default: 300)
//! - `STOREFRONT_SEND_DELAY_MS` - Simulated contact send latency (default: 800)
//! - `STOREFRONT_FEEDBACK_MS` - How long "Added!" stays on a card (default: 1000)
//! - `STOREFRONT_EMAIL_PUBLIC_KEY` - Email service key; switches the contact acknowledgement
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::services::MailerMode;

const DEFAULT_STORE_NAME: &str = "Lustre Fine Jewelry";
const DEFAULT_DATA_DIR: &str = ".lustre";
const DEFAULT_PAGE_FILE: &str = "index.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Timer periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period before a typed search runs.
    pub search_debounce: Duration,
    /// Simulated contact send latency.
    pub send_delay: Duration,
    /// Add-to-cart feedback period.
    pub feedback: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(300),
            send_delay: Duration::from_millis(800),
            feedback: Duration::from_millis(1000),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Store name for the page header and title
    pub store_name: String,
    /// Directory holding the key-value store file
    pub data_dir: PathBuf,
    /// Output path for the assembled page
    pub page_path: PathBuf,
    /// Optional catalog seed file
    pub catalog_path: Option<PathBuf>,
    /// Timer periods
    pub timings: Timings,
    /// Email service public key, if any
    pub email_public_key: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            page_path: data_dir.join(DEFAULT_PAGE_FILE),
            data_dir,
            catalog_path: None,
            timings: Timings::default(),
            email_public_key: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let page_path = env
            .optional("STOREFRONT_PAGE_PATH")
            .map_or_else(|| data_dir.join(DEFAULT_PAGE_FILE), PathBuf::from);

        let defaults = Timings::default();
        let timings = Timings {
            search_debounce: env.millis("STOREFRONT_SEARCH_DEBOUNCE_MS", defaults.search_debounce)?,
            send_delay: env.millis("STOREFRONT_SEND_DELAY_MS", defaults.send_delay)?,
            feedback: env.millis("STOREFRONT_FEEDBACK_MS", defaults.feedback)?,
        };

        Ok(Self {
            store_name: env.or_default("STOREFRONT_NAME", DEFAULT_STORE_NAME),
            data_dir,
            page_path,
            catalog_path: env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            timings,
            email_public_key: env.optional("STOREFRONT_EMAIL_PUBLIC_KEY"),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Whether an email service key is configured.
    #[must_use]
    pub const fn mailer_mode(&self) -> MailerMode {
        if self.email_public_key.is_some() {
            MailerMode::Configured
        } else {
            MailerMode::Unconfigured
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a duration given in whole milliseconds.
    fn millis(&self, key: &str, default: Duration) -> Result<Duration, ConfigError> {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.store_name, DEFAULT_STORE_NAME);
        assert_eq!(config.data_dir, PathBuf::from(".lustre"));
        assert_eq!(config.page_path, PathBuf::from(".lustre/index.html"));
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.timings.search_debounce, Duration::from_millis(300));
        assert_eq!(config.mailer_mode(), MailerMode::Unconfigured);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_page_path_follows_data_dir() {
        let config = load(&[("STOREFRONT_DATA_DIR", "/tmp/shop")]).unwrap();
        assert_eq!(config.page_path, PathBuf::from("/tmp/shop/index.html"));

        let config = load(&[
            ("STOREFRONT_DATA_DIR", "/tmp/shop"),
            ("STOREFRONT_PAGE_PATH", "/srv/www/shop.html"),
        ])
        .unwrap();
        assert_eq!(config.page_path, PathBuf::from("/srv/www/shop.html"));
    }

    #[test]
    fn test_timings_override() {
        let config = load(&[
            ("STOREFRONT_SEARCH_DEBOUNCE_MS", "150"),
            ("STOREFRONT_SEND_DELAY_MS", " 0 "),
        ])
        .unwrap();
        assert_eq!(config.timings.search_debounce, Duration::from_millis(150));
        assert_eq!(config.timings.send_delay, Duration::ZERO);
        assert_eq!(config.timings.feedback, Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_millis_rejected() {
        let err = load(&[("STOREFRONT_FEEDBACK_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_FEEDBACK_MS"));

        assert!(load(&[("STOREFRONT_SEARCH_DEBOUNCE_MS", "-5")]).is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[
            ("STOREFRONT_EMAIL_PUBLIC_KEY", "  "),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();
        assert!(config.email_public_key.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_email_key_configures_mailer() {
        let config = load(&[("STOREFRONT_EMAIL_PUBLIC_KEY", "pk_live_123")]).unwrap();
        assert_eq!(config.mailer_mode(), MailerMode::Configured);
    }
}
