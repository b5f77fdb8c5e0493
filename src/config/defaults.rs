//! Default configuration values for jsd-oneshot.
//!
//! This module provides type-safe default values that are used by the
//! `config init` subcommand to generate configuration templates.

use super::settings::Config;

/// The user agent baked into both outbound HTTP requests and the
/// fingerprint payload (`n.userAgent`/`n.appVersion`), grounded on
/// `original_source/solver/solver.go`'s literal header tables.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Returns the default `Config` for configuration generation.
pub fn default_settings() -> Config {
    Config {
        cache_dir: None,
        cache_ttl_seconds: Some(3600),
        timeout_seconds: Some(30),
        user_agent: Some(DEFAULT_USER_AGENT.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_has_cache_ttl_of_one_hour() {
        let settings = default_settings();
        assert_eq!(settings.cache_ttl_seconds, Some(3600));
    }

    #[test]
    fn default_settings_serializes_to_valid_toml() {
        let settings = default_settings();
        let toml_string =
            toml::to_string_pretty(&settings).expect("should serialize to TOML without error");
        assert!(toml_string.contains("cacheTtlSeconds = 3600"));
    }
}
