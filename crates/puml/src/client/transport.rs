//! Transport strategy: issuing the GET request for a composed URL

use std::time::Duration;

use tracing::{debug, trace};
use ureq::Agent;

use crate::core::{PumlError, Result};

/// Maximum response body accepted from the server (50 MB).
pub const MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a `200 OK` response
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches the bytes behind a URL
///
/// Implementations report connection-level failures as errors and return
/// every HTTP response, whatever its status, as a [`TransportResponse`].
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<TransportResponse> + Send + Sync,
{
    fn get(&self, url: &str) -> Result<TransportResponse> {
        self(url)
    }
}

/// Blocking HTTP transport backed by `ureq`
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /// Transport without a deadline
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Transport whose requests fail once `timeout` has elapsed
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        Self { agent }
    }

    /// Use a preconfigured agent
    ///
    /// The agent should be built with `http_status_as_error(false)` so that
    /// error statuses reach the client's [`StatusPolicy`](crate::core::StatusPolicy).
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        trace!(url, "Issuing GET");

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| PumlError::network_error(url, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_to_vec()
            .map_err(|e| PumlError::network_error(url, e.to_string()))?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::ok(Vec::new()).is_success());
        assert!(TransportResponse::new(204, Vec::new()).is_success());
        assert!(!TransportResponse::new(302, Vec::new()).is_success());
        assert!(!TransportResponse::new(400, b"bad".to_vec()).is_success());
        assert!(!TransportResponse::new(500, Vec::new()).is_success());
    }

    #[test]
    fn test_closure_transport() {
        let transport = |url: &str| -> Result<TransportResponse> {
            Ok(TransportResponse::ok(url.as_bytes().to_vec()))
        };
        let response = Transport::get(&transport, "http://example.test/svg/x").unwrap();
        assert_eq!(response.body, b"http://example.test/svg/x");
    }
}
