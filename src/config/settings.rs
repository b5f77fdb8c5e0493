use serde::{Deserialize, Serialize};

/// Layered runtime configuration for the oneshot client.
///
/// Every field is optional so a layer can leave it unset and defer to the
/// next layer down (builtin defaults -> user TOML file -> CLI flags).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory used to cache fetched scripts. `None` disables the cache.
    pub cache_dir: Option<String>,
    /// How long a cached script stays fresh before it's re-fetched.
    pub cache_ttl_seconds: Option<u64>,
    /// HTTP client timeout for both the homepage and script fetch.
    pub timeout_seconds: Option<u64>,
    /// `User-Agent` sent on every outbound request; also embedded in the
    /// fingerprint payload's `n.userAgent`/`n.appVersion` entries.
    pub user_agent: Option<String>,
}
