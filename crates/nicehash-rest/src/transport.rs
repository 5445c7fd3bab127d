//! HTTP transport abstraction
//!
//! This module provides a trait-based abstraction over the HTTP exchange,
//! enabling unit testing of request construction without real network calls.
//!
//! [`HttpTransport`] only moves bytes. [`send`] sits on top of it and maps
//! the outcome into the crate's error taxonomy:
//!
//! - connect, DNS, timeout and body read failures: [`RestError::Transport`]
//! - non-2xx status: [`RestError::Api`] with status and body verbatim
//! - 2xx with a body that is not JSON: [`RestError::Decode`]

use crate::envelope::Envelope;
use crate::error::{RestError, RestResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
#[cfg(any(test, feature = "test-utils"))]
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection could not be established
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// No complete response within the timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other failure while sending or reading
    #[error("request failed: {0}")]
    Request(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport abstraction
///
/// Implementations perform exactly one exchange per call: no retries, no
/// caching.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the envelope and return the raw response
    async fn execute(&self, envelope: &Envelope) -> Result<HttpResponse, TransportError>;
}

/// Send an envelope and decode the JSON response
#[instrument(skip_all, fields(method = %envelope.method, url = %envelope.url))]
pub async fn send(transport: &dyn HttpTransport, envelope: &Envelope) -> RestResult<Value> {
    debug!("Sending request");
    let response = transport.execute(envelope).await?;

    if !response.is_success() {
        warn!(status = response.status, "NiceHash API returned an error status");
        return Err(RestError::Api {
            status: response.status,
            method: envelope.method,
            url: envelope.url.clone(),
            body: response.body,
        });
    }

    serde_json::from_str(&response.body).map_err(|e| {
        RestError::Decode(format!(
            "invalid JSON from {} {}: {}",
            envelope.method, envelope.url, e
        ))
    })
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if error.is_connect() {
            TransportError::ConnectionFailed(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, envelope: &Envelope) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.request(envelope.method.into(), &envelope.url);

        if let Some(headers) = &envelope.signed_headers {
            for (name, value) in headers.to_pairs() {
                request = request.header(name, value);
            }
        }

        if let Some(body) = &envelope.body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse { status, body })
    }
}

/// Mock transport for testing
///
/// Returns queued responses in order and records every envelope it was
/// asked to send.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    sent: parking_lot::Mutex<Vec<Envelope>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn push_response(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Take the envelopes sent so far
    pub fn take_sent(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.sent.lock())
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, envelope: &Envelope) -> Result<HttpResponse, TransportError> {
        self.sent.lock().push(envelope.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::ConnectionFailed(
                    "no mock response queued".into(),
                ))
            })
    }
}
