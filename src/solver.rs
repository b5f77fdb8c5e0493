//! Orchestrates the end-to-end oneshot flow: fetch the homepage and
//! challenge script, run the analyzer, assemble the beacon payload, and
//! send it — grounded on `original_source/solver/solver.go`'s
//! `OneshotSolver.Solve`/`SolveFromData`.

use crate::beacon::{self, params};
use crate::config::Config;
use crate::deob::{self, AnalysisResult};
use crate::error::SolveError;
use crate::fetch::HttpFetcher;

/// Caller-supplied data that lets a solve skip the initial homepage
/// request, mirroring the Go client's `SolveData`.
pub struct SolveData {
    pub r: String,
    pub t: String,
    pub script_url: Option<String>,
}

/// Runs the full flow against `target_url`, fetching the homepage for
/// `r`/`t` itself.
pub fn solve(target_url: &str, config: &Config, now: &str, now_unix: i64) -> Result<beacon::SolveOutcome, SolveError> {
    let fetcher = HttpFetcher::new(config);
    let target_url = target_url.trim_end_matches('/');
    let origin = beacon::fingerprint::origin_from_url(target_url);

    let homepage = fetcher.fetch_homepage(target_url)?;
    let (r, t) = params::extract_cv_params(&homepage)?;

    solve_from_params(target_url, &origin, r, t, None, &fetcher, now, now_unix)
}

/// Runs the flow using caller-provided `r`/`t`, skipping the homepage
/// fetch, mirroring `SolveFromData`.
pub fn solve_from_data(target_url: &str, config: &Config, data: SolveData, now: &str, now_unix: i64) -> Result<beacon::SolveOutcome, SolveError> {
    let fetcher = HttpFetcher::new(config);
    let target_url = target_url.trim_end_matches('/');
    let origin = beacon::fingerprint::origin_from_url(target_url);

    solve_from_params(target_url, &origin, data.r, data.t, data.script_url, &fetcher, now, now_unix)
}

fn solve_from_params(
    target_url: &str,
    origin: &str,
    r: String,
    t: String,
    script_url: Option<String>,
    fetcher: &HttpFetcher,
    now: &str,
    now_unix: i64,
) -> Result<beacon::SolveOutcome, SolveError> {
    let script_url = script_url.unwrap_or_else(|| format!("{origin}/cdn-cgi/challenge-platform/scripts/jsd/main.js"));
    let script = fetcher.fetch_script(&script_url)?;

    let analysis = deob::analyze(&script)?;
    for warning in &analysis.warnings {
        log::warn!("analyzer warning: {warning:?}");
    }

    let deobfuscated = crate::ast::generate(&analysis.program);
    let raw_table = params::extract_raw_table(&deobfuscated);
    let (sitekey, path) = params::extract_sitekey_and_path(&deobfuscated, raw_table.as_deref())?;

    let outcome = send_beacon(target_url, origin, &sitekey, &path, &r, &t, &analysis, now, now_unix)?;
    Ok(outcome)
}

fn send_beacon(
    target_url: &str,
    origin: &str,
    sitekey: &str,
    path: &str,
    r: &str,
    t: &str,
    analysis: &AnalysisResult,
    now: &str,
    now_unix: i64,
) -> Result<beacon::SolveOutcome, SolveError> {
    let timestamp = beacon::request::decode_timestamp(t, now_unix);
    let fingerprint = beacon::fingerprint::build(target_url, now);
    let body = beacon::request::build_body(timestamp, fingerprint, &analysis.alphabet)?;
    let endpoint = beacon::request::endpoint_url(origin, sitekey, path, r);

    let client = beacon::ReqwestClient::new();
    let outcome = beacon::send_oneshot(&client, &endpoint, origin, body)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_data_carries_script_url_override() {
        let data = SolveData {
            r: "r".to_string(),
            t: "t".to_string(),
            script_url: Some("https://example.com/custom.js".to_string()),
        };
        assert_eq!(data.script_url.as_deref(), Some("https://example.com/custom.js"));
    }
}
