//! Common test utilities and fixtures for integration tests
//!
//! Response bodies follow the shapes returned by api2.nicehash.com.

#![allow(dead_code)]

use async_trait::async_trait;
use nicehash_rest::{
    ClientConfig, Credentials, Envelope, HttpResponse, HttpTransport, NiceHashClient, SyncPolicy,
    TransportError,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

pub const API_KEY: &str = "4ebd366d-76f4-4400-a3b6-e51515d054d6";
pub const API_SECRET: &str = concat!(
    "fd8a1652-728b-42fe-82b8-f623e56da885",
    "0750f5bf-ce66-4ca7-8b84-93651abc723b"
);
pub const ORG_ID: &str = "da41b3bc-3d0b-4226-b7ea-aee73f94a518";

/// 2100-01-01, far ahead of the local clock
pub const SERVER_TIME: i64 = 4_102_444_800_000;

pub fn server_time_body() -> String {
    format!(r#"{{"serverTime":{}}}"#, SERVER_TIME)
}

pub const BALANCES_BODY: &str = r#"{
    "total": {"currency": "TBTC", "totalBalance": "0.0021", "available": "0.0021", "pending": "0"},
    "currencies": [
        {"active": true, "currency": "TBTC", "totalBalance": "0.0021", "available": "0.0021"}
    ]
}"#;

pub const ERROR_BODY: &str = concat!(
    r#"{"error_id":"1b1f7e3e","#,
    r#""errors":[{"code":2000,"message":"Invalid session"}]}"#
);

/// Transport that replays canned responses and records requests
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<Envelope>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<Envelope> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Envelope {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, envelope: &Envelope) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(envelope.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ConnectionFailed("no response queued".into())))
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, API_SECRET)
        .expect("valid credentials")
        .with_organization(ORG_ID)
}

pub fn config(policy: SyncPolicy) -> ClientConfig {
    ClientConfig::new()
        .with_api_host("https://api-test.nicehash.com")
        .with_sync_policy(policy)
}

/// Authenticated client with manual sync
pub fn authed_client() -> (NiceHashClient, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let client = NiceHashClient::with_transport(
        config(SyncPolicy::Manual).with_credentials(credentials()),
        transport.clone(),
    );
    (client, transport)
}

/// Unauthenticated client with the given policy
pub fn public_client(policy: SyncPolicy) -> (NiceHashClient, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let client = NiceHashClient::with_transport(config(policy), transport.clone());
    (client, transport)
}
