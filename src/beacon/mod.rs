//! Oneshot beacon: challenge-parameter extraction, payload assembly, and
//! the final request/response exchange with the challenge platform.

pub mod client;
pub mod fingerprint;
pub mod params;
pub mod request;

pub use client::{send_oneshot, Client, ReqwestClient, Request, Response, SolveOutcome};
pub use params::ChallengeParams;
