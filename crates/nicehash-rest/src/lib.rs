//! REST API client for NiceHash
//!
//! This crate builds, signs and sends requests to the NiceHash REST API and
//! returns the decoded JSON responses.
//!
//! # Features
//!
//! - **Clock sync**: Server time offset applied to every `X-Time`
//! - **Signing**: HMAC-SHA256 `X-Auth` header for private endpoints
//! - **Queries**: Structured or raw, merged with queries embedded in the path
//! - **Endpoint groups**: Accounting, mining, external miner, hashpower, exchange
//!
//! # Authentication
//!
//! Private endpoints require an API key, secret and organization id. Without
//! credentials the client still sends the nonce, time and language headers,
//! but no `X-Auth`.
//!
//! # Example
//!
//! ```no_run
//! use nicehash_rest::{ClientConfig, Credentials, NiceHashClient, RequestSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env()?;
//!     let client = NiceHashClient::new(ClientConfig::new().with_credentials(credentials))?;
//!
//!     // Requests fail until the clock offset is known
//!     client.sync().await?;
//!
//!     let rigs = client
//!         .send(RequestSpec::get("/main/api/v2/mining/rigs2?size=10"))
//!         .await?;
//!     println!("Rigs: {}", rigs);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::NiceHashClient;
pub use clock::SessionState;
pub use config::{ClientConfig, SyncPolicy};
pub use envelope::{Envelope, RequestSpec, SignedHeaders};
pub use error::{RestError, RestResult, RestResultExt};
pub use nicehash_auth::Credentials;
pub use query::{QueryBuilder, QueryValue};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{Body, Method, ServerTime};

pub use endpoints::hashpower::MyOrdersFilter;

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;
