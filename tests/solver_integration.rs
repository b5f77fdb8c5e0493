//! End-to-end pipeline test: analyzer output -> extracted params ->
//! assembled beacon body -> sent through a stub transport, without any
//! network access.

use jsd_oneshot::beacon::{self, Client, Request, Response};
use jsd_oneshot::{ast, deob};

const OBFUSCATED_SCRIPT: &str = r#"
    var WK = {k0:100,k1:101,k2:102,k3:103,k4:104,k5:105,k6:106,k7:107,k8:108};
    function D(a,b){D=function(c,d){return d-100};return D(a,b)}
    D=D-100;
    var table = "xkKZ4,/jsd/oneshot/abc123".split(",");
    xkKZ4 = parseInt(D(0));
    var path = parseInt(D(1));
    y = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/".charAt(3);
"#;

struct StubClient {
    status: u16,
    cf_clearance: Option<&'static str>,
}

impl Client for StubClient {
    fn send(&self, _request: Request) -> Result<Response, jsd_oneshot::error::BeaconError> {
        Ok(Response {
            status: self.status,
            body: String::new(),
            cookies: self
                .cf_clearance
                .map(|v| vec![("cf_clearance".to_string(), v.to_string())])
                .unwrap_or_default(),
        })
    }
}

#[test]
fn analyzer_output_feeds_a_valid_beacon_request() {
    let analysis = deob::analyze(OBFUSCATED_SCRIPT).expect("analysis should succeed");
    assert_eq!(analysis.alphabet.len(), 64);

    let deobfuscated = ast::generate(&analysis.program);
    let fingerprint = beacon::fingerprint::build("https://example.com/challenge", "07/30/2026 12:00:00");
    let timestamp = beacon::request::decode_timestamp("not-base64", 1_700_000_000);
    let body = beacon::request::build_body(timestamp, fingerprint, &analysis.alphabet).expect("body should build");
    assert!(!body.is_empty());

    let endpoint = beacon::request::endpoint_url("https://example.com", "sitekey123", "path456", "rsuffix");
    assert_eq!(
        endpoint,
        "https://example.com/cdn-cgi/challenge-platform/h/sitekey123/jsd/oneshot/path456rsuffix"
    );

    let client = StubClient {
        status: 200,
        cf_clearance: Some("clearance-token"),
    };
    let outcome = beacon::send_oneshot(&client, &endpoint, "https://example.com", body).expect("send should succeed");
    assert!(outcome.success);
    assert_eq!(outcome.cf_clearance.as_deref(), Some("clearance-token"));

    // `deobfuscated` still carries the long split-string table literal since
    // rewrite only replaces decoder calls, not the table variable itself.
    assert!(deobfuscated.contains("jsd/oneshot"));
}

#[test]
fn a_rejected_challenge_without_cf_clearance_is_reported_as_failure() {
    let endpoint = "https://example.com/cdn-cgi/challenge-platform/h/sk/jsd/oneshot/pabc";
    let client = StubClient {
        status: 403,
        cf_clearance: None,
    };
    let outcome = beacon::send_oneshot(&client, endpoint, "https://example.com", String::new()).expect("send should succeed");
    assert!(!outcome.success);
    assert!(outcome.cf_clearance.is_none());
}
