//! Main REST client implementation

use crate::clock::{self, SessionState};
use crate::config::{ClientConfig, SyncPolicy};
use crate::endpoints::{
    AccountingEndpoints, ExchangePublicEndpoints, ExternalMinerEndpoints, HashPowerEndpoints,
    MinerPrivateEndpoints,
};
use crate::envelope::{self, Envelope, RequestSpec};
use crate::error::{RestError, RestResult};
use crate::query::QueryValue;
use crate::transport::{self, HttpTransport, ReqwestTransport};
use crate::types::Body;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// NiceHash REST API client
///
/// Cloning is cheap; clones share the transport and the synchronized clock.
///
/// # Example
///
/// ```no_run
/// use nicehash_rest::{ClientConfig, NiceHashClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = NiceHashClient::public()?;
///     client.sync().await?;
///     let prices = client.exchange_public().get_prices().await?;
///
///     // With authentication for private endpoints
///     let auth_client = NiceHashClient::new(ClientConfig::from_env()?)?;
///     let balances = auth_client.accounting().get_balances(false, None).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NiceHashClient {
    config: Arc<ClientConfig>,
    session: Arc<SessionState>,
    transport: Arc<dyn HttpTransport>,
}

impl NiceHashClient {
    /// Create a new client over HTTPS
    pub fn new(config: ClientConfig) -> RestResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create an unauthenticated client with default settings
    ///
    /// Only public endpoints will be usable.
    pub fn public() -> RestResult<Self> {
        Self::new(ClientConfig::default())
    }

    /// Create a client from `NICEHASH_*` environment variables
    pub fn from_env() -> RestResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        info!(
            api_host = %config.api_host,
            authenticated = config.credentials.is_some(),
            "Created NiceHash REST client"
        );

        Self {
            config: Arc::new(config),
            session: Arc::new(SessionState::new()),
            transport,
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.config.credentials.is_some()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Check if the server clock offset is known
    pub fn is_synced(&self) -> bool {
        self.session.is_synced()
    }

    // ========================================================================
    // Core
    // ========================================================================

    /// Fetch the server time and store the clock offset
    ///
    /// Returns the offset in milliseconds (`server - local`).
    pub async fn sync(&self) -> RestResult<i64> {
        clock::sync(self.transport.as_ref(), &self.config.api_host, &self.session).await
    }

    /// Build the signed envelope for a request without sending it
    pub fn build_envelope(&self, spec: RequestSpec) -> RestResult<Envelope> {
        envelope::build(&self.config, &self.session, spec)
    }

    /// Sign and send a request
    ///
    /// Never syncs on its own: fails with
    /// [`RestError::ClockNotSynchronized`] before the first [`sync`](Self::sync).
    pub async fn send(&self, spec: RequestSpec) -> RestResult<Value> {
        let envelope = self.build_envelope(spec)?;
        transport::send(self.transport.as_ref(), &envelope).await
    }

    // ========================================================================
    // Convenience (applies the sync policy)
    // ========================================================================

    /// Sync according to the configured [`SyncPolicy`], then send
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn call(&self, spec: RequestSpec) -> RestResult<Value> {
        match self.config.sync_policy {
            SyncPolicy::Manual => {}
            SyncPolicy::OnFirstCall if self.session.is_synced() => {}
            SyncPolicy::OnFirstCall | SyncPolicy::EveryCall => {
                debug!("Refreshing server time before request");
                self.sync().await?;
            }
        }
        self.send(spec).await
    }

    /// GET with an optional query
    pub async fn get(&self, path: &str, query: Option<QueryValue>) -> RestResult<Value> {
        self.call(RequestSpec::get(path).with_optional_query(query))
            .await
    }

    /// POST with a body
    pub async fn post(&self, path: &str, body: impl Into<Body>) -> RestResult<Value> {
        self.call(RequestSpec::post(path).with_body(body)).await
    }

    /// PUT with a body
    pub async fn put(&self, path: &str, body: impl Into<Body>) -> RestResult<Value> {
        self.call(RequestSpec::put(path).with_body(body)).await
    }

    /// DELETE
    pub async fn delete(&self, path: &str) -> RestResult<Value> {
        self.call(RequestSpec::delete(path)).await
    }

    // ========================================================================
    // Endpoint Groups
    // ========================================================================

    /// Wallet, deposits, withdrawals, transactions
    pub fn accounting(&self) -> AccountingEndpoints<'_> {
        AccountingEndpoints::new(self)
    }

    /// Rigs and mining statistics of the authenticated account
    pub fn miner_private(&self) -> MinerPrivateEndpoints<'_> {
        MinerPrivateEndpoints::new(self)
    }

    /// Rigs mining to an external BTC address
    pub fn external_miner(&self) -> ExternalMinerEndpoints<'_> {
        ExternalMinerEndpoints::new(self)
    }

    /// Hashpower marketplace
    pub fn hashpower(&self) -> HashPowerEndpoints<'_> {
        HashPowerEndpoints::new(self)
    }

    /// Public exchange market data
    pub fn exchange_public(&self) -> ExchangePublicEndpoints<'_> {
        ExchangePublicEndpoints::new(self)
    }
}

impl std::fmt::Debug for NiceHashClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NiceHashClient")
            .field("api_host", &self.config.api_host)
            .field("has_credentials", &self.has_credentials())
            .field("clock_offset", &self.session.offset())
            .finish()
    }
}

impl TryFrom<ClientConfig> for NiceHashClient {
    type Error = RestError;

    fn try_from(config: ClientConfig) -> RestResult<Self> {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{HEADER_AUTH, HEADER_NONCE, HEADER_ORGANIZATION, HEADER_TIME};
    use crate::transport::MockTransport;
    use nicehash_auth::Credentials;
    use serde_json::json;

    const TIME_RESPONSE: &str = r#"{"serverTime":1700000000000}"#;

    fn client(policy: SyncPolicy, credentials: bool) -> (NiceHashClient, Arc<MockTransport>) {
        let mut config = ClientConfig::new()
            .with_api_host("https://mock.test")
            .with_sync_policy(policy);
        if credentials {
            config = config.with_credentials(Credentials::new("key", "secret").unwrap());
        }
        let transport = Arc::new(MockTransport::new());
        (NiceHashClient::with_transport(config, transport.clone()), transport)
    }

    #[test]
    fn test_client_without_credentials() {
        let client = NiceHashClient::public().unwrap();
        assert!(!client.has_credentials());
        assert!(!client.is_synced());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = NiceHashClient::new(ClientConfig::new().with_api_host("ftp://nope"));
        assert!(matches!(result, Err(RestError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_send_before_sync_fails_without_network() {
        let (client, transport) = client(SyncPolicy::OnFirstCall, true);

        let result = client.send(RequestSpec::get("/main/api/v2/mining/rigs2")).await;
        assert!(matches!(result, Err(RestError::ClockNotSynchronized)));
        assert!(transport.take_sent().is_empty());
    }

    #[tokio::test]
    async fn test_manual_policy_requires_sync() {
        let (client, transport) = client(SyncPolicy::Manual, false);

        let result = client.get("/main/api/v2/public/buy/info", None).await;
        assert!(matches!(result, Err(RestError::ClockNotSynchronized)));
        assert!(transport.take_sent().is_empty());

        transport.push_response(200, TIME_RESPONSE);
        client.sync().await.unwrap();
        transport.push_response(200, "{}");
        client.get("/main/api/v2/public/buy/info", None).await.unwrap();
        assert_eq!(transport.take_sent().len(), 2);
    }

    #[tokio::test]
    async fn test_on_first_call_syncs_once() {
        let (client, transport) = client(SyncPolicy::OnFirstCall, false);
        transport.push_response(200, TIME_RESPONSE);
        transport.push_response(200, "{}");
        transport.push_response(200, "{}");

        client.get("/a", None).await.unwrap();
        client.get("/b", None).await.unwrap();

        let urls: Vec<String> = transport.take_sent().into_iter().map(|e| e.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://mock.test/api/v2/time",
                "https://mock.test/a",
                "https://mock.test/b"
            ]
        );
    }

    #[tokio::test]
    async fn test_every_call_syncs_each_time() {
        let (client, transport) = client(SyncPolicy::EveryCall, false);
        for _ in 0..2 {
            transport.push_response(200, TIME_RESPONSE);
            transport.push_response(200, "{}");
        }

        client.get("/a", None).await.unwrap();
        client.delete("/b").await.unwrap();

        let sent = transport.take_sent();
        assert_eq!(sent.len(), 4);
        assert!(sent[0].url.ends_with("/api/v2/time"));
        assert!(sent[2].url.ends_with("/api/v2/time"));
    }

    #[tokio::test]
    async fn test_failed_sync_stops_call() {
        let (client, transport) = client(SyncPolicy::OnFirstCall, false);
        transport.push_response(500, "down");

        let result = client.get("/a", None).await;
        assert!(matches!(result, Err(RestError::Api { status: 500, .. })));
        assert_eq!(transport.take_sent().len(), 1);
    }

    #[tokio::test]
    async fn test_signed_post() {
        let (client, transport) = client(SyncPolicy::Manual, true);
        transport.push_response(200, TIME_RESPONSE);
        client.sync().await.unwrap();

        transport.push_response(200, r#"{"id":"order-1"}"#);
        let response = client
            .post("/main/api/v2/hashpower/order", json!({"limit": "0.01"}))
            .await
            .unwrap();
        assert_eq!(response["id"], "order-1");

        let sent = transport.take_sent();
        let envelope = &sent[1];
        assert_eq!(envelope.body.as_deref(), Some(r#"{"limit":"0.01"}"#));
        assert!(envelope.header(HEADER_AUTH).unwrap().starts_with("key:"));
        assert_eq!(envelope.header(HEADER_ORGANIZATION), Some(""));
        assert!(envelope.header(HEADER_NONCE).is_some());
        assert!(envelope.header(HEADER_TIME).is_some());
    }

    #[tokio::test]
    async fn test_clones_share_clock() {
        let (client, transport) = client(SyncPolicy::Manual, false);
        let clone = client.clone();

        transport.push_response(200, TIME_RESPONSE);
        client.sync().await.unwrap();
        assert!(clone.is_synced());
    }
}
