//! Homepage + challenge-script fetcher (spec.md §4.9's external
//! collaborator contract, made concrete), with an on-disk response cache.

pub mod cache;

use std::time::Duration;

use crate::config::Config;
use crate::error::FetchError;
use cache::Cache;

/// Wraps a blocking `reqwest` client and an optional on-disk [`Cache`].
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    cache: Option<Cache>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(30));
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| crate::config::defaults::DEFAULT_USER_AGENT.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("reqwest client builder should not fail with these options");

        let cache = config
            .cache_dir
            .as_ref()
            .map(|dir| Cache::new(dir, Duration::from_secs(config.cache_ttl_seconds.unwrap_or(3600))));

        Self { client, cache }
    }

    pub fn fetch_homepage(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)
    }

    /// Fetches the challenge script, serving from the on-disk cache when a
    /// fresh entry exists (development convenience; a live oneshot run
    /// should always see the current script).
    pub fn fetch_script(&self, url: &str) -> Result<String, FetchError> {
        let key = cache::cache_key(url);
        if let Some(cache) = &self.cache
            && let Some(cached) = cache.read(&key)
        {
            return Ok(cached);
        }

        let body = self.get(url)?;

        if let Some(cache) = &self.cache {
            let _ = cache.write(&key, &body);
        }

        Ok(body)
    }

    fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        response.text().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}
