//! Transport seam and request errors

use thiserror::Error;

use crate::request::Payload;

/// Why a completion attempt failed.
///
/// Never returned from [`crate::Request::run`]; its text ends up in
/// [`crate::Response::error`].
#[derive(Error, Debug)]
pub enum RequestError {
    /// `run` was called without a preceding `prepare`
    #[error("request not prepared")]
    NotPrepared,

    /// The endpoint answered with a non-2xx status
    #[error("HTTP {status} {reason}")]
    Transport { status: u16, reason: String },

    /// Connection, timeout, malformed JSON or missing keys
    #[error("{0}")]
    Exchange(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Exchange(e.to_string())
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(e: serde_json::Error) -> Self {
        RequestError::Exchange(format!("invalid response body: {}", e))
    }
}

pub type RequestResult<T> = Result<T, RequestError>;

/// Raw outcome of one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    /// Reason phrase of the status line
    pub reason: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the single POST of a completion attempt
pub trait Transport: Send + Sync {
    /// POST `payload` as JSON to `endpoint` with bearer `token`
    fn post(&self, endpoint: &str, token: &str, payload: &Payload) -> RequestResult<HttpReply>;
}
