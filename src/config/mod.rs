pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::Config;

/// Merge two `Config` layers, preferring values from `primary` over
/// `fallback` field-by-field (grounded on the teacher's `merge_settings`
/// three-way layering: builtin defaults -> user file -> CLI flags).
pub fn merge_settings(fallback: Config, primary: Option<Config>) -> Config {
    let Some(primary) = primary else {
        return fallback;
    };
    Config {
        cache_dir: primary.cache_dir.or(fallback.cache_dir),
        cache_ttl_seconds: primary.cache_ttl_seconds.or(fallback.cache_ttl_seconds),
        timeout_seconds: primary.timeout_seconds.or(fallback.timeout_seconds),
        user_agent: primary.user_agent.or(fallback.user_agent),
    }
}

/// Loads the effective configuration: builtin defaults, overridden by the
/// user's XDG TOML file if present, overridden by CLI-supplied overrides.
pub fn load(cli_overrides: Option<Config>) -> Result<Config, user::UserConfigError> {
    let base = defaults::default_settings();
    let with_user = merge_settings(base, user::load_user_config()?);
    Ok(merge_settings(with_user, cli_overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_primary_when_present() {
        let fallback = Config {
            cache_dir: Some("/fallback".to_string()),
            cache_ttl_seconds: Some(3600),
            timeout_seconds: Some(30),
            user_agent: Some("fallback-ua".to_string()),
        };
        let primary = Config {
            cache_dir: None,
            cache_ttl_seconds: Some(60),
            timeout_seconds: None,
            user_agent: None,
        };
        let merged = merge_settings(fallback, Some(primary));
        assert_eq!(merged.cache_dir, Some("/fallback".to_string()));
        assert_eq!(merged.cache_ttl_seconds, Some(60));
        assert_eq!(merged.timeout_seconds, Some(30));
        assert_eq!(merged.user_agent, Some("fallback-ua".to_string()));
    }

    #[test]
    fn merge_with_no_primary_returns_fallback_unchanged() {
        let fallback = defaults::default_settings();
        let merged = merge_settings(fallback.clone(), None);
        assert_eq!(merged, fallback);
    }
}
