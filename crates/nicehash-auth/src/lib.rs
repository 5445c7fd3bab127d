//! Credentials and request signing for the NiceHash API
//!
//! This crate has no networking. It provides the three pieces every
//! authenticated NiceHash request needs:
//!
//! - [`generate_nonce`] - 32 character single-use request token
//! - [`signing_payload`] / [`sign`] - the NUL separated canonical payload and
//!   its HMAC-SHA256 signature
//! - [`Credentials`] - API key, secret (zeroized on drop) and organization id
//!
//! # Example
//!
//! ```
//! use nicehash_auth::{generate_nonce, Credentials, SigningRequest};
//!
//! let creds = Credentials::new("my-key", "my-secret").unwrap().with_organization("my-org");
//! let nonce = generate_nonce();
//! let request = SigningRequest::new("GET", "/main/api/v2/accounting/accounts2");
//!
//! let header = creds.sign("1616492376594", &nonce, &request);
//! assert!(header.starts_with("my-key:"));
//! ```

mod credentials;
mod error;
mod nonce;
mod signature;

pub use credentials::{Credentials, ENV_API_KEY, ENV_API_SECRET, ENV_ORGANIZATION_ID};
pub use error::{AuthError, AuthResult};
pub use nonce::{generate_nonce, NONCE_LEN};
pub use signature::{sign, signing_payload, SigningRequest};
