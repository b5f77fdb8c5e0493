//! Error handling types for jsd-oneshot.
//!
//! One `thiserror`-derived enum per logical layer, wrapped by a top-level
//! [`SolveError`] so the CLI has a single error type to report.

use thiserror::Error;

pub use crate::ast::AstError;
pub use crate::deob::AnalyzeError;

/// Errors from the LZ-string-style codec (malformed compressed input).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("compressed payload is empty")]
    Empty,
    #[error("compressed payload contains a character outside the codec alphabet")]
    InvalidCharacter,
}

/// Errors fetching the homepage or challenge script.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response body exceeded the {limit}-byte cap")]
    TooLarge { limit: usize },
    #[error("cache I/O error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Errors assembling or sending the oneshot beacon.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("could not find __CF$cv$params in homepage response")]
    MissingCvParams,
    #[error("could not extract site key from script")]
    MissingSitekey,
    #[error("could not extract oneshot path from script")]
    MissingPath,
    #[error("beacon request failed: {0}")]
    Transport(#[from] FetchError),
    #[error("failed to serialize beacon payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to read beacon response body: {0}")]
    ResponseIo(#[from] std::io::Error),
}

/// Top-level error covering the full solve pipeline.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("script did not parse: {0}")]
    Ast(#[from] AstError),
    #[error("analysis failed: {0}")]
    Analyze(#[from] AnalyzeError),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("beacon error: {0}")]
    Beacon(#[from] BeaconError),
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::user::UserConfigError),
}

pub type SolveResult<T> = Result<T, SolveError>;
