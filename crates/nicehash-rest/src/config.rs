//! Client configuration
//!
//! [`ClientConfig`] is immutable once a client is built. It can be put
//! together with the `with_*` builder methods, read from the environment or
//! loaded from a JSON credentials file:
//!
//! ```json
//! { "apiKey": "...", "apiSecret": "...", "orgId": "...", "locale": "en" }
//! ```

use crate::error::{RestError, RestResult};
use nicehash_auth::{Credentials, ENV_API_KEY, ENV_API_SECRET, ENV_ORGANIZATION_ID};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Production API host
pub const DEFAULT_API_HOST: &str = "https://api2.nicehash.com";

/// Language sent in `X-User-Lang`
pub const DEFAULT_LOCALE: &str = "en";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API host
pub const ENV_API_HOST: &str = "NICEHASH_API_HOST";

/// Environment variable overriding the locale
pub const ENV_LOCALE: &str = "NICEHASH_LOCALE";

/// When the endpoint helpers fetch the server time
///
/// This only affects the convenience methods (`get`, `post`, endpoint
/// groups). [`crate::NiceHashClient::send`] never syncs by itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Never; the caller must call `sync()` first
    Manual,
    /// Once, before the first request of the session
    #[default]
    OnFirstCall,
    /// Before every request
    EveryCall,
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Value of `X-User-Lang`
    pub locale: String,
    /// Scheme and host, without a trailing slash
    pub api_host: String,
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout
    pub timeout: Duration,
    /// Custom `X-User-Agent`
    pub user_agent: Option<String>,
    /// Server time refresh policy for the endpoint helpers
    pub sync_policy: SyncPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            sync_policy: SyncPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set API host, e.g. `https://api-test.nicehash.com`
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into().trim_end_matches('/').to_string();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set sync policy
    pub fn with_sync_policy(mut self, sync_policy: SyncPolicy) -> Self {
        self.sync_policy = sync_policy;
        self
    }

    /// Build a configuration from environment variables
    ///
    /// Reads `NICEHASH_API_KEY`, `NICEHASH_API_SECRET`, `NICEHASH_ORG_ID`,
    /// `NICEHASH_API_HOST` and `NICEHASH_LOCALE`. All are optional; without a
    /// key and secret the client is unauthenticated.
    pub fn from_env() -> RestResult<Self> {
        let var = |name: &str| std::env::var(name).ok();

        Self::from_parts(ConfigFile {
            locale: var(ENV_LOCALE),
            api_host: var(ENV_API_HOST),
            api_key: var(ENV_API_KEY),
            api_secret: var(ENV_API_SECRET),
            org_id: var(ENV_ORGANIZATION_ID),
        })
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> RestResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RestError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> RestResult<Self> {
        let file: ConfigFile = serde_json::from_str(json)
            .map_err(|e| RestError::InvalidConfig(format!("invalid config JSON: {}", e)))?;
        Self::from_parts(file)
    }

    fn from_parts(parts: ConfigFile) -> RestResult<Self> {
        let mut config = Self::default();

        if let Some(locale) = non_empty(parts.locale) {
            config = config.with_locale(locale);
        }
        if let Some(api_host) = non_empty(parts.api_host) {
            config = config.with_api_host(api_host);
        }

        match (non_empty(parts.api_key), non_empty(parts.api_secret)) {
            (Some(key), Some(secret)) => {
                let credentials = Credentials::new(key, secret)?
                    .with_organization(parts.org_id.unwrap_or_default());
                config = config.with_credentials(credentials);
            }
            (Some(_), None) => {
                return Err(RestError::InvalidConfig(
                    "API key given without an API secret".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(RestError::InvalidConfig(
                    "API secret given without an API key".to_string(),
                ))
            }
            (None, None) => {}
        }

        Ok(config)
    }

    /// Check the configuration before building a client
    pub fn validate(&self) -> RestResult<()> {
        if !(self.api_host.starts_with("https://") || self.api_host.starts_with("http://")) {
            return Err(RestError::InvalidConfig(format!(
                "API host must start with http:// or https://, got {:?}",
                self.api_host
            )));
        }
        if self.locale.is_empty() {
            return Err(RestError::InvalidConfig("locale is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(RestError::InvalidConfig("timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// On-disk configuration, camelCase keys
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    locale: Option<String>,
    api_host: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    #[serde(alias = "organizationId")]
    org_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
