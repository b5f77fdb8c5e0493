//! Sends the oneshot beacon request and surfaces `cf_clearance`, grounded
//! on `original_source/solver/solver.go`'s `sendOneshot`/`setHeaders`.

use std::io::Read;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::defaults::DEFAULT_USER_AGENT;
use crate::error::{BeaconError, FetchError};

/// Response body cap, matching the Go client's `io.LimitReader(resp.Body, 2*1024*1024)`.
const MAX_RESPONSE_BYTES: u64 = 2 * 1024 * 1024;

const SEC_CH_UA: &str = r#""Google Chrome";v="143", "Chromium";v="143", "Not A(Brand";v="24""#;

/// A fully-assembled oneshot POST, headers and body included.
pub struct Request {
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// The beacon's response: status, capped body, and any `Set-Cookie`
/// pairs the challenge platform returned.
pub struct Response {
    pub status: u16,
    pub body: String,
    pub cookies: Vec<(String, String)>,
}

impl Response {
    pub fn cf_clearance(&self) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(name, _)| name == "cf_clearance")
            .map(|(_, value)| value.as_str())
    }
}

/// Sends an assembled [`Request`] and returns the raw [`Response`].
///
/// `reqwest` does not preserve wire header order the way the Go client's
/// `fhttp` does, so the default implementation is a best-effort
/// reproduction of header *presence* and *values*, not byte-exact
/// ordering — see the TLS/JA3 fingerprinting gap noted in DESIGN.md.
pub trait Client {
    fn send(&self, request: Request) -> Result<Response, BeaconError>;
}

/// Default [`Client`] backed by a blocking `reqwest` client.
pub struct ReqwestClient {
    inner: HttpClient,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            inner: HttpClient::builder()
                .build()
                .expect("reqwest client builder should not fail with these options"),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Client for ReqwestClient {
    fn send(&self, request: Request) -> Result<Response, BeaconError> {
        let response = self
            .inner
            .post(&request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .map_err(|source| FetchError::Http {
                url: request.url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let cookies: Vec<(String, String)> = response
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();

        let mut limited = response.take(MAX_RESPONSE_BYTES);
        let mut body = String::new();
        limited.read_to_string(&mut body)?;

        Ok(Response { status, body, cookies })
    }
}

/// Result of a completed oneshot attempt.
#[derive(Debug)]
pub struct SolveOutcome {
    pub status: u16,
    pub body: String,
    pub cf_clearance: Option<String>,
    pub success: bool,
}

/// Builds the oneshot request and drives it through a [`Client`],
/// surfacing `cf_clearance` the way `sendOneshot` treats it as the
/// definitive success signal regardless of status code.
pub fn send_oneshot(client: &dyn Client, endpoint: &str, origin: &str, body: String) -> Result<SolveOutcome, BeaconError> {
    let request = Request {
        url: endpoint.to_string(),
        headers: oneshot_headers(origin),
        body,
    };
    let response = client.send(request)?;

    let cf_clearance = response.cf_clearance().map(|s| s.to_string());
    let success = cf_clearance.is_some() || (200..300).contains(&response.status);

    Ok(SolveOutcome {
        status: response.status,
        body: response.body,
        cf_clearance,
        success,
    })
}

fn header(name: &'static str, value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(value).expect("header value should be a valid ASCII string"),
    )
}

fn oneshot_headers(origin: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in [
        header("sec-ch-ua-platform", r#""Windows""#),
        header("user-agent", DEFAULT_USER_AGENT),
        header("sec-ch-ua", SEC_CH_UA),
        header("content-type", "text/plain;charset=UTF-8"),
        header("sec-ch-ua-mobile", "?0"),
        header("accept", "*/*"),
        header("origin", origin),
        header("sec-fetch-site", "same-origin"),
        header("sec-fetch-mode", "cors"),
        header("sec-fetch-dest", "empty"),
        header("accept-encoding", "gzip, deflate, br, zstd"),
        header("accept-language", "en-US,en;q=0.9"),
        header("priority", "u=1, i"),
    ] {
        map.insert(name, value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oneshot_headers_include_content_type_and_origin() {
        let headers = oneshot_headers("https://example.com");
        assert_eq!(headers.get("content-type").unwrap(), "text/plain;charset=UTF-8");
        assert_eq!(headers.get("origin").unwrap(), "https://example.com");
    }

    struct StubClient {
        response: std::cell::RefCell<Option<Response>>,
    }

    impl Client for StubClient {
        fn send(&self, _request: Request) -> Result<Response, BeaconError> {
            Ok(self.response.borrow_mut().take().expect("stub called once"))
        }
    }

    #[test]
    fn send_oneshot_treats_cf_clearance_as_success_even_on_failure_status() {
        let stub = StubClient {
            response: std::cell::RefCell::new(Some(Response {
                status: 403,
                body: String::new(),
                cookies: vec![("cf_clearance".to_string(), "abc".to_string())],
            })),
        };
        let outcome = send_oneshot(&stub, "https://example.com/beacon", "https://example.com", String::new()).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.cf_clearance.as_deref(), Some("abc"));
    }

    #[test]
    fn send_oneshot_without_cf_clearance_falls_back_to_status() {
        let stub = StubClient {
            response: std::cell::RefCell::new(Some(Response {
                status: 200,
                body: String::new(),
                cookies: vec![],
            })),
        };
        let outcome = send_oneshot(&stub, "https://example.com/beacon", "https://example.com", String::new()).unwrap();
        assert!(outcome.success);
        assert!(outcome.cf_clearance.is_none());
    }
}
