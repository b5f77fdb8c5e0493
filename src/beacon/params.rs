//! Challenge parameter extraction: the homepage's `__CF$cv$params` block
//! and the deobfuscated script's site key / oneshot path, grounded on
//! `original_source/solver/solver.go`'s `fetchChallengeParams`/
//! `parseScript`.

use regex::Regex;

use crate::error::BeaconError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChallengeParams {
    pub r: String,
    pub t: String,
    pub sitekey: String,
    pub path: String,
}

/// Extracts `r`/`t` from the homepage's `__CF$cv$params = {...}` block.
pub fn extract_cv_params(homepage: &str) -> Result<(String, String), BeaconError> {
    let block_re = Regex::new(r#"__CF\$cv\$params\s*=\s*\{([^}]*(?:r\s*:\s*['"][^'"]*['"])[^}]*)\}"#)
        .expect("static regex is valid");
    let block = block_re
        .captures(homepage)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| {
            let line_re = Regex::new(r#"__CF\$cv\$params\s*=\s*\{[^}]+\}"#).expect("static regex is valid");
            line_re.find(homepage).map(|m| m.as_str().to_string())
        })
        .ok_or(BeaconError::MissingCvParams)?;

    let r_re = Regex::new(r#"\br\s*:\s*['"]([a-fA-F0-9]+)['"]"#).expect("static regex is valid");
    let t_re = Regex::new(r#"\bt\s*:\s*['"]([A-Za-z0-9+/=]+)['"]"#).expect("static regex is valid");

    let r = r_re
        .captures(&block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(BeaconError::MissingCvParams)?;
    let t = t_re
        .captures(&block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(BeaconError::MissingCvParams)?;

    Ok((r, t))
}

/// Recovers the long `"...".split(',')` table literal, if the script has
/// one, for the oneshot-path fallback lookup.
pub fn extract_raw_table(script: &str) -> Option<String> {
    let table_re = Regex::new(r#"['"]([^'"]{500,})['"]\.split\(['"],['"]\)"#).expect("static regex is valid");
    table_re.captures(script).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// Extracts the site key and oneshot path from the deobfuscated script,
/// with the long-split-string fallback for the path.
pub fn extract_sitekey_and_path(deobfuscated: &str, raw_table: Option<&str>) -> Result<(String, String), BeaconError> {
    let sitekey_re = Regex::new(r#"xkKZ4:\s*['"]([^'"]+)['"]"#).expect("static regex is valid");
    let sitekey = sitekey_re
        .captures(deobfuscated)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(BeaconError::MissingSitekey)?;

    let path_re = Regex::new(r#"/jsd/oneshot/([^'",\)]+)"#).expect("static regex is valid");
    let mut path = path_re
        .captures(deobfuscated)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    if path.is_empty()
        && let Some(table) = raw_table
    {
        path = table
            .split(',')
            .find_map(|entry| entry.strip_prefix("/jsd/oneshot/"))
            .map(|s| s.to_string())
            .unwrap_or_default();
    }

    if path.is_empty() {
        return Err(BeaconError::MissingPath);
    }

    Ok((sitekey, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_cv_params_from_homepage_block() {
        let homepage = r#"<script>window.__CF$cv$params = {r: 'abc123', t: 'dGVzdA=='};</script>"#;
        let (r, t) = extract_cv_params(homepage).unwrap();
        assert_eq!(r, "abc123");
        assert_eq!(t, "dGVzdA==");
    }

    #[test]
    fn missing_cv_params_is_an_error() {
        assert!(extract_cv_params("<html></html>").is_err());
    }

    #[test]
    fn extracts_sitekey_and_path_directly() {
        let script = r#"var xkKZ4 = 'abc'; fetch("/jsd/oneshot/def456");"#;
        let (sitekey, path) = extract_sitekey_and_path(script, None).unwrap();
        assert_eq!(sitekey, "abc");
        assert_eq!(path, "def456");
    }

    #[test]
    fn falls_back_to_table_entry_for_path() {
        let script = r#"var xkKZ4 = 'abc';"#;
        let table = "foo,bar,/jsd/oneshot/fallback-path,baz";
        let (_, path) = extract_sitekey_and_path(script, Some(table)).unwrap();
        assert_eq!(path, "fallback-path");
    }

    #[test]
    fn missing_sitekey_is_an_error() {
        let script = r#"fetch("/jsd/oneshot/def456");"#;
        assert!(extract_sitekey_and_path(script, None).is_err());
    }

    #[test]
    fn extracts_raw_table_from_long_split_string() {
        let entries: Vec<String> = (0..120).map(|i| format!("entry{i}")).collect();
        let table = entries.join(",");
        let script = format!(r#"var t = "{table}".split(',');"#);
        let extracted = extract_raw_table(&script).unwrap();
        assert_eq!(extracted, table);
    }

    #[test]
    fn raw_table_is_none_when_absent() {
        assert!(extract_raw_table("var x = 1;").is_none());
    }
}
