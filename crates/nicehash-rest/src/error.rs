//! Error types for REST API operations

use crate::transport::TransportError;
use crate::types::Method;
use nicehash_auth::AuthError;
use tracing::error;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// A request was attempted before the server clock offset was known
    #[error("Clock not synchronized: call sync() before issuing requests")]
    ClockNotSynchronized,

    /// Network level failure (connect, DNS, timeout, broken body)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status
    #[error("API error {status} for {method} {url}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Request method
        method: Method,
        /// Full request URL including the query string
        url: String,
        /// Response body, verbatim
        body: String,
    },

    /// A 2xx response whose body is not valid JSON (or not the expected shape)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Credential problem
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the same request might succeed if sent again later
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the server rejected the request as malformed or unauthorized
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// Log-and-discard adapter for callers that prefer `Option` over errors
pub trait RestResultExt<T> {
    /// Log the error through `tracing` and return `None` in its place
    fn log_err(self) -> Option<T>;
}

impl<T> RestResultExt<T> for RestResult<T> {
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(RestError::Api {
                status,
                method,
                url,
                body,
            }) => {
                error!(status, %method, %url, %body, "NiceHash API request failed");
                None
            }
            Err(e) => {
                error!(error = %e, "NiceHash API request failed");
                None
            }
        }
    }
}
