//! Integration tests for the NiceHash REST client
//!
//! Drives the public client API over a recording transport: clock sync,
//! header construction, signing, error mapping and endpoint routing.

mod common;

use common::*;
use nicehash_auth::{sign, SigningRequest};
use nicehash_rest::envelope::{
    HEADER_AUTH, HEADER_NONCE, HEADER_ORGANIZATION, HEADER_REQUEST_ID, HEADER_TIME,
    HEADER_USER_AGENT, HEADER_USER_LANG, USER_AGENT,
};
use nicehash_rest::{
    Method, QueryBuilder, RequestSpec, RestError, RestResultExt, SyncPolicy, TransportError,
};
use serde_json::json;
use std::time::Duration;

// =============================================================================
// Clock Synchronization
// =============================================================================

#[tokio::test]
async fn test_request_before_sync_is_rejected_locally() {
    let (client, transport) = authed_client();

    let err = client
        .send(RequestSpec::get("/main/api/v2/accounting/accounts2"))
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::ClockNotSynchronized));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_time_header_follows_server_clock() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, BALANCES_BODY);

    let offset = client.sync().await.unwrap();
    assert!(offset > 0);

    client
        .send(RequestSpec::get("/main/api/v2/accounting/accounts2"))
        .await
        .unwrap();

    let time: i64 = transport
        .last_request()
        .header(HEADER_TIME)
        .unwrap()
        .parse()
        .unwrap();
    assert!(time >= SERVER_TIME && time < SERVER_TIME + 60_000);
}

#[tokio::test]
async fn test_explicit_time_is_used_verbatim() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, "{}");
    client.sync().await.unwrap();

    client
        .send(RequestSpec::get("/main/api/v2/mining/rigs2").at_time(1_600_000_000_000))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().header(HEADER_TIME),
        Some("1600000000000")
    );
}

#[tokio::test]
async fn test_sync_request_is_bare() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());

    client.sync().await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://api-test.nicehash.com/api/v2/time");
    assert!(request.signed_headers.is_none());
}

// =============================================================================
// Headers and Signing
// =============================================================================

#[tokio::test]
async fn test_authenticated_headers() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, r#"{"id":"7a2b"}"#);
    client.sync().await.unwrap();

    let body = json!({"algorithm": "SHA256", "amount": "0.005", "price": "1.45"});
    client
        .send(
            RequestSpec::post("/main/api/v2/hashpower/order?market=EU")
                .with_query(QueryBuilder::new().param("type", "STANDARD").build().unwrap())
                .with_body(body),
        )
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(
        request.url,
        "https://api-test.nicehash.com/main/api/v2/hashpower/order?market=EU&type=STANDARD"
    );

    let nonce = request.header(HEADER_NONCE).unwrap();
    assert_eq!(request.header(HEADER_REQUEST_ID), Some(nonce));
    assert_eq!(request.header(HEADER_USER_AGENT), Some(USER_AGENT));
    assert_eq!(request.header(HEADER_USER_LANG), Some("en"));
    assert_eq!(request.header(HEADER_ORGANIZATION), Some(ORG_ID));

    let time = request.header(HEADER_TIME).unwrap();
    let expected = sign(
        API_KEY,
        API_SECRET,
        time,
        nonce,
        ORG_ID,
        &SigningRequest::new("POST", "/main/api/v2/hashpower/order")
            .with_query(Some("market=EU&type=STANDARD"))
            .with_body(Some(r#"{"algorithm":"SHA256","amount":"0.005","price":"1.45"}"#)),
    );
    assert_eq!(request.header(HEADER_AUTH), Some(expected.as_str()));
    assert!(expected.starts_with(&format!("{}:", API_KEY)));
}

#[tokio::test]
async fn test_unauthenticated_request_has_no_auth_headers() {
    let (client, transport) = public_client(SyncPolicy::Manual);
    transport.respond(200, server_time_body());
    transport.respond(200, "{}");
    client.sync().await.unwrap();

    client
        .send(RequestSpec::get("/main/api/v2/public/simplemultialgo/info"))
        .await
        .unwrap();

    let request = transport.last_request();
    assert!(request.header(HEADER_AUTH).is_none());
    assert!(request.header(HEADER_ORGANIZATION).is_none());
    assert!(request.header(HEADER_NONCE).is_some());
    assert!(request.header(HEADER_TIME).is_some());
}

#[tokio::test]
async fn test_each_request_gets_a_fresh_nonce() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, "{}");
    transport.respond(200, "{}");
    client.sync().await.unwrap();

    for _ in 0..2 {
        client.send(RequestSpec::get("/x")).await.unwrap();
    }

    let requests = transport.requests();
    assert_ne!(
        requests[1].header(HEADER_NONCE),
        requests[2].header(HEADER_NONCE)
    );
}

// =============================================================================
// Sync Policies
// =============================================================================

#[tokio::test]
async fn test_on_first_call_policy() {
    let (client, transport) = public_client(SyncPolicy::OnFirstCall);
    transport.respond(200, server_time_body());
    transport.respond(200, "{}");
    transport.respond(200, "{}");

    client.hashpower().get_buy_info().await.unwrap();
    client.hashpower().get_stats_current().await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].url.ends_with("/api/v2/time"));
    assert!(client.is_synced());
}

#[tokio::test]
async fn test_every_call_policy() {
    let (client, transport) = public_client(SyncPolicy::EveryCall);
    for _ in 0..2 {
        transport.respond(200, server_time_body());
        transport.respond(200, "{}");
    }

    client.exchange_public().get_market_stats().await.unwrap();
    client.exchange_public().get_exchange_status().await.unwrap();

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api-test.nicehash.com/api/v2/time",
            "https://api-test.nicehash.com/exchange/api/v2/info/marketStats",
            "https://api-test.nicehash.com/api/v2/time",
            "https://api-test.nicehash.com/exchange/api/v2/info/status",
        ]
    );
}

#[tokio::test]
async fn test_manual_policy_never_syncs() {
    let (client, transport) = public_client(SyncPolicy::Manual);

    let err = client.exchange_public().get_prices().await.unwrap_err();
    assert!(matches!(err, RestError::ClockNotSynchronized));
    assert!(transport.requests().is_empty());
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_api_error_keeps_body() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(401, ERROR_BODY);
    client.sync().await.unwrap();

    let err = client
        .accounting()
        .get_balances(false, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_client_error());
    assert!(!err.is_retryable());
    match err {
        RestError::Api { method, url, body, .. } => {
            assert_eq!(method, Method::Get);
            assert_eq!(
                url,
                concat!(
                    "https://api-test.nicehash.com/main/api/v2/accounting/accounts2",
                    "?extendedResponse=false"
                )
            );
            assert_eq!(body, ERROR_BODY);
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_error_is_retryable() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.fail(TransportError::Timeout(Duration::from_secs(30)));
    client.sync().await.unwrap();

    let err = client.send(RequestSpec::get("/x")).await.unwrap_err();
    assert!(matches!(err, RestError::Transport(TransportError::Timeout(_))));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_log_err_discards_error() {
    let (client, _transport) = public_client(SyncPolicy::Manual);

    let result = client.send(RequestSpec::get("/x")).await.log_err();
    assert!(result.is_none());
}

// =============================================================================
// Endpoint Groups
// =============================================================================

#[tokio::test]
async fn test_balances_round_trip() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, BALANCES_BODY);
    client.sync().await.unwrap();

    let balances = client
        .accounting()
        .get_balances(true, Some("EUR"))
        .await
        .unwrap();

    assert_eq!(balances["total"]["currency"], "TBTC");
    assert_eq!(balances["currencies"][0]["available"], "0.0021");
    assert_eq!(
        transport.last_request().query.as_deref(),
        Some("extendedResponse=true&fiat=EUR")
    );
}

#[tokio::test]
async fn test_path_query_and_endpoint_query_merge() {
    let (client, transport) = authed_client();
    transport.respond(200, server_time_body());
    transport.respond(200, "{}");
    client.sync().await.unwrap();

    client
        .get(
            "/main/api/v2/mining/rigs2?size=10&path=",
            QueryBuilder::new().param("size", 50).build(),
        )
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().query.as_deref(),
        Some("size=50&path=")
    );
}

// =============================================================================
// Live API Test (Ignored by default)
// =============================================================================

#[tokio::test]
#[ignore]
async fn test_live_server_time() {
    // Run manually with:
    // cargo test -p nicehash-rest test_live_server_time -- --ignored
    let client = nicehash_rest::NiceHashClient::public().unwrap();
    let offset = client.sync().await.unwrap();
    assert!(offset.abs() < 24 * 60 * 60 * 1000);
}
