//! API credentials for NiceHash
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::signature::{self, SigningRequest};

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "NICEHASH_API_KEY";
/// Environment variable holding the API secret
pub const ENV_API_SECRET: &str = "NICEHASH_API_SECRET";
/// Environment variable holding the organization id
pub const ENV_ORGANIZATION_ID: &str = "NICEHASH_ORG_ID";

/// API credentials for authenticated requests
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// API secret, zeroized on drop
    api_secret: SecretString,
    /// Organization the key belongs to
    organization_id: Option<String>,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    ///
    /// Both values must be non-empty.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if api_secret.is_empty() {
            return Err(AuthError::InvalidCredentials("API secret is empty".to_string()));
        }

        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
            organization_id: None,
        })
    }

    /// Attach an organization id
    ///
    /// An empty id is treated as no organization.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        let organization_id = organization_id.into();
        self.organization_id = (!organization_id.is_empty()).then_some(organization_id);
        self
    }

    /// Create credentials from environment variables
    ///
    /// Reads `NICEHASH_API_KEY` and `NICEHASH_API_SECRET`, plus the optional
    /// `NICEHASH_ORG_ID`.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_API_KEY.to_string()))?;
        let api_secret = std::env::var(ENV_API_SECRET)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_API_SECRET.to_string()))?;

        let credentials = Self::new(api_key, api_secret)?;
        let credentials = match std::env::var(ENV_ORGANIZATION_ID) {
            Ok(org) => credentials.with_organization(org),
            Err(_) => credentials,
        };

        debug!(
            has_organization = credentials.organization_id.is_some(),
            "Loaded API credentials from environment"
        );
        Ok(credentials)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the organization id, empty when none is configured
    pub fn organization_id(&self) -> &str {
        self.organization_id.as_deref().unwrap_or("")
    }

    /// Sign a request
    ///
    /// Returns the full `X-Auth` header value.
    pub fn sign(&self, timestamp: &str, nonce: &str, request: &SigningRequest<'_>) -> String {
        signature::sign(
            &self.api_key,
            self.api_secret.expose_secret(),
            timestamp,
            nonce,
            self.organization_id(),
            request,
        )
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretString::from(self.api_secret.expose_secret().to_string()),
            organization_id: self.organization_id.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible = self
            .api_key
            .char_indices()
            .nth(8)
            .map_or(self.api_key.as_str(), |(idx, _)| &self.api_key[..idx]);

        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("api_secret", &"[REDACTED]")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}
