//! NiceHash request signatures
//!
//! The `X-Auth` header is `api_key:hex(HMAC-SHA256(api_secret, payload))`
//! where the payload is the NUL separated sequence
//!
//! ```text
//! api_key \0 time \0 nonce \0 \0 org_id \0 \0 method \0 path \0 query [\0 body]
//! ```
//!
//! The two empty segments are reserved by the server and must stay empty.
//! Query and body are passed in already serialized: the exact bytes that go
//! on the wire are the bytes that get signed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: &[u8] = b"\0";

/// The request-dependent part of the signed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningRequest<'a> {
    /// HTTP method, upper case
    pub method: &'a str,
    /// Path without the query string
    pub path: &'a str,
    /// Encoded query string, without the leading `?`
    pub query: Option<&'a str>,
    /// Serialized body
    pub body: Option<&'a str>,
}

impl<'a> SigningRequest<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            query: None,
            body: None,
        }
    }

    pub fn with_query(mut self, query: Option<&'a str>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Option<&'a str>) -> Self {
        self.body = body;
        self
    }
}

/// Build the canonical byte sequence that gets signed
pub fn signing_payload(
    api_key: &str,
    timestamp: &str,
    nonce: &str,
    organization_id: &str,
    request: &SigningRequest<'_>,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(
        api_key.len()
            + timestamp.len()
            + nonce.len()
            + organization_id.len()
            + request.method.len()
            + request.path.len()
            + request.query.map_or(0, str::len)
            + request.body.map_or(0, str::len)
            + 10,
    );

    let segments: [&[u8]; 8] = [
        api_key.as_bytes(),
        timestamp.as_bytes(),
        nonce.as_bytes(),
        b"",
        organization_id.as_bytes(),
        b"",
        request.method.as_bytes(),
        request.path.as_bytes(),
    ];
    for segment in segments {
        payload.extend_from_slice(segment);
        payload.extend_from_slice(SEPARATOR);
    }

    if let Some(query) = request.query {
        payload.extend_from_slice(query.as_bytes());
    }

    if let Some(body) = request.body.filter(|body| !body.is_empty()) {
        payload.extend_from_slice(SEPARATOR);
        payload.extend_from_slice(body.as_bytes());
    }

    payload
}

/// Compute the `X-Auth` header value for a request
pub fn sign(
    api_key: &str,
    api_secret: &str,
    timestamp: &str,
    nonce: &str,
    organization_id: &str,
    request: &SigningRequest<'_>,
) -> String {
    let payload = signing_payload(api_key, timestamp, nonce, organization_id, request);

    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(&payload);
    let digest = mac.finalize().into_bytes();

    format!("{}:{}", api_key, hex::encode(digest))
}
