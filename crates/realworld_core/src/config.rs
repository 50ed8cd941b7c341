//! Core runtime configuration.
//!
//! # Responsibility
//! - Hold tunables shared by storage bootstrap and services.
//! - Provide defaults usable without any external configuration source.
//!
//! # Invariants
//! - `max_page_limit >= default_page_limit` after `normalized()`.
//! - `slug_max_attempts` is at least 1 after `normalized()`.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_SLUG_MAX_ATTEMPTS: u32 = 3;

/// Tunables for the content core.
///
/// Deserializable so hosts can embed it in their own config files; every
/// field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// How long a storage call waits on a locked database before failing
    /// with a retryable error.
    pub busy_timeout_ms: u64,
    /// Page size used when a list request carries no explicit limit.
    pub default_page_limit: u32,
    /// Upper bound applied to explicit list limits.
    pub max_page_limit: u32,
    /// Slug generations attempted before a collision is reported as conflict.
    pub slug_max_attempts: u32,
    /// Log level passed to `init_logging` by hosts that use it.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            slug_max_attempts: DEFAULT_SLUG_MAX_ATTEMPTS,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Returns a copy with out-of-range values pulled back into range.
    pub fn normalized(mut self) -> Self {
        if self.default_page_limit == 0 {
            self.default_page_limit = DEFAULT_PAGE_LIMIT;
        }
        if self.max_page_limit < self.default_page_limit {
            self.max_page_limit = self.default_page_limit;
        }
        if self.slug_max_attempts == 0 {
            self.slug_max_attempts = 1;
        }
        self
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Resolves the effective page size for one list request.
    ///
    /// `Some(0)` is kept as zero: an explicit empty page is a valid request.
    pub fn page_limit(&self, requested: Option<u32>) -> u32 {
        match requested {
            Some(value) if value > self.max_page_limit => self.max_page_limit,
            Some(value) => value,
            None => self.default_page_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;

    #[test]
    fn page_limit_defaults_caps_and_keeps_zero() {
        let config = CoreConfig::default();
        assert_eq!(config.page_limit(None), 20);
        assert_eq!(config.page_limit(Some(0)), 0);
        assert_eq!(config.page_limit(Some(7)), 7);
        assert_eq!(config.page_limit(Some(10_000)), 100);
    }

    #[test]
    fn normalized_repairs_inconsistent_values() {
        let config = CoreConfig {
            default_page_limit: 0,
            max_page_limit: 5,
            slug_max_attempts: 0,
            ..CoreConfig::default()
        }
        .normalized();
        assert_eq!(config.default_page_limit, 20);
        assert_eq!(config.max_page_limit, 20);
        assert_eq!(config.slug_max_attempts, 1);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: CoreConfig =
            serde_json::from_str(r#"{ "busy_timeout_ms": 250, "max_page_limit": 50 }"#).unwrap();
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.max_page_limit, 50);
        assert_eq!(config.default_page_limit, 20);
        assert_eq!(config.slug_max_attempts, 3);
        assert_eq!(config.log_level, CoreConfig::default().log_level);
    }
}
