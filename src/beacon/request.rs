//! Wire-contract JSON assembly and endpoint construction (spec.md §6).

use serde_json::{Map, Value};

use crate::codec::lz;
use crate::error::BeaconError;

/// Builds `{t, lhr, api, payload}` with exact key order, LZ-compresses it
/// to base64 using the alphabet recovered by the analyzer, and returns the
/// request body.
pub fn build_body(timestamp: i64, fingerprint: Map<String, Value>, alphabet: &str) -> Result<String, BeaconError> {
    let mut body = Map::new();
    body.insert("t".to_string(), Value::from(timestamp));
    body.insert("lhr".to_string(), Value::from("about:blank"));
    body.insert("api".to_string(), Value::from(false));
    body.insert("payload".to_string(), Value::Object(fingerprint));

    let json = serde_json::to_string(&Value::Object(body))?;
    let compressed = lz::compress(alphabet, &json);
    Ok(pad_base64ish(compressed))
}

/// The codec alphabet recovered by the analyzer is not necessarily the
/// standard base64 alphabet, but the wire format still pads to a multiple
/// of 4 the same way (grounded on `utils/lz_string.go`'s `CompressToBase64`).
fn pad_base64ish(mut s: String) -> String {
    match s.len() % 4 {
        1 => s.push_str("==="),
        2 => s.push_str("=="),
        3 => s.push('='),
        _ => {}
    }
    s
}

/// `{origin}/cdn-cgi/challenge-platform/h/{sitekey}/jsd/oneshot/{path}{r}`
pub fn endpoint_url(origin: &str, sitekey: &str, path: &str, r: &str) -> String {
    format!("{origin}/cdn-cgi/challenge-platform/h/{sitekey}/jsd/oneshot/{path}{r}")
}

/// Recovers the beacon timestamp by base64-decoding `t` and parsing a
/// leading decimal, falling back to wall-clock time on any failure.
pub fn decode_timestamp(t: &str, now: i64) -> i64 {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(t)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map(|decoded| crate::deob::jsparseint::js_parse_int(&decoded) as i64)
        .filter(|&ts| ts != 0)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_matches_wire_contract_shape() {
        let url = endpoint_url("https://example.com", "sk", "path123", "rsuffix");
        assert_eq!(
            url,
            "https://example.com/cdn-cgi/challenge-platform/h/sk/jsd/oneshot/path123rsuffix"
        );
    }

    #[test]
    fn build_body_preserves_key_order_before_compression() {
        let fp = Map::new();
        let compressed = build_body(1234, fp, lz::BASE64_ALPHABET).unwrap();
        let decompressed = lz::decompress_from_base64(&compressed);
        assert!(decompressed.starts_with(r#"{"t":1234,"lhr":"about:blank","api":false,"payload":{"#));
    }

    #[test]
    fn decode_timestamp_parses_leading_decimal() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode("1700000000");
        assert_eq!(decode_timestamp(&encoded, 0), 1_700_000_000);
    }

    #[test]
    fn decode_timestamp_falls_back_on_garbage_input() {
        assert_eq!(decode_timestamp("not base64!!", 42), 42);
    }
}
