//! User configuration loading for jsd-oneshot.
//!
//! This module handles loading user-wide configuration from the XDG config
//! directory. Location: $XDG_CONFIG_HOME/jsd-oneshot/jsd-oneshot.toml
//! Fallback: ~/.config/jsd-oneshot/jsd-oneshot.toml

use crate::config::Config;
use log::warn;
use std::path::PathBuf;
use thiserror::Error;

pub type UserConfigResult<T> = Result<T, UserConfigError>;

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("failed to read user config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse user config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads user configuration from the XDG config directory.
///
/// Returns `Ok(None)` for a missing file (zero-config experience
/// preserved); `Err` only for a file that exists but fails to parse.
pub fn load_user_config() -> UserConfigResult<Option<Config>> {
    let path = match user_config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| UserConfigError::Io {
        path: path.clone(),
        source: e,
    })?;

    let settings = toml::from_str::<Config>(&contents)
        .map_err(|e| UserConfigError::Parse { path, source: e })?;

    Ok(Some(settings))
}

/// Returns the path to the user configuration file.
///
/// Security: `XDG_CONFIG_HOME` is validated to prevent path traversal —
/// must be absolute and must not contain `..` components. Invalid values
/// fall back to `~/.config` with a warning.
pub fn user_config_path() -> Option<PathBuf> {
    use std::path::{Component, Path};

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let xdg_path = Path::new(&xdg_config);

        if !xdg_path.is_absolute() {
            warn!(
                "XDG_CONFIG_HOME is not an absolute path: '{}'. Falling back to ~/.config",
                xdg_config
            );
        } else if xdg_path.components().any(|c| c == Component::ParentDir) {
            warn!(
                "XDG_CONFIG_HOME contains path traversal (..) components: '{}'. Falling back to ~/.config",
                xdg_config
            );
        } else {
            return Some(xdg_path.join("jsd-oneshot").join("jsd-oneshot.toml"));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join("jsd-oneshot").join("jsd-oneshot.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial(xdg_env)]
    fn user_config_path_uses_xdg_config_home_when_set() {
        let original = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let path = user_config_path();

        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(
            path,
            Some(PathBuf::from("/custom/config/jsd-oneshot/jsd-oneshot.toml"))
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn load_user_config_returns_none_for_missing_file() {
        use tempfile::TempDir;

        let original = env::var("XDG_CONFIG_HOME").ok();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = load_user_config();

        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert!(result.unwrap().is_none());
    }

    #[test]
    #[serial(xdg_env)]
    fn load_user_config_loads_valid_toml_file() {
        use std::fs;
        use tempfile::TempDir;

        let original = env::var("XDG_CONFIG_HOME").ok();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config_dir = temp_dir.path().join("jsd-oneshot");
        fs::create_dir_all(&config_dir).expect("failed to create config dir");

        let config_path = config_dir.join("jsd-oneshot.toml");
        fs::write(&config_path, "cacheTtlSeconds = 60\n").expect("failed to write config file");

        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = load_user_config();

        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        let settings = result.unwrap().unwrap();
        assert_eq!(settings.cache_ttl_seconds, Some(60));
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_path_rejects_path_traversal_in_xdg_config_home() {
        let original = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/safe/../../../etc");
        }

        let path = user_config_path().unwrap();

        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        let path_str = path.to_string_lossy();
        assert!(path_str.contains(".config"));
        assert!(!path_str.contains("/etc/"));
    }
}
