//! Blocking HTTPS transport

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::base::{HttpReply, RequestResult, Transport};
use crate::request::Payload;

/// Upper bound on one exchange; there is no per-call override
pub const READ_TIMEOUT: Duration = Duration::from_secs(600);

/// `reqwest` blocking client with rustls TLS
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(READ_TIMEOUT)
    }

    /// Bound every exchange by `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: &str, token: &str, payload: &Payload) -> RequestResult<HttpReply> {
        debug!(
            "POST {} (model {}, {} messages)",
            endpoint,
            payload.model,
            payload.messages.len()
        );

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .timeout(self.timeout)
            .json(payload)
            .send()?;

        let status = response.status();
        let reason = status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
        let body = response.text()?;

        Ok(HttpReply {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}
