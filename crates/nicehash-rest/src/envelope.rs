//! Request envelopes
//!
//! An [`Envelope`] is a fully formed request: URL with encoded query,
//! serialized body and the NiceHash headers. Building one consumes a fresh
//! nonce and a timestamp; it never touches the clock offset.

use crate::clock::SessionState;
use crate::config::ClientConfig;
use crate::error::RestResult;
use crate::query::{self, QueryValue};
use crate::types::{Body, Method};
use nicehash_auth::{generate_nonce, SigningRequest};

/// Default `X-User-Agent`
pub const USER_AGENT: &str = concat!("nicehash-rest/", env!("CARGO_PKG_VERSION"));

pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_USER_AGENT: &str = "X-User-Agent";
pub const HEADER_TIME: &str = "X-Time";
pub const HEADER_NONCE: &str = "X-Nonce";
pub const HEADER_USER_LANG: &str = "X-User-Lang";
pub const HEADER_AUTH: &str = "X-Auth";
pub const HEADER_ORGANIZATION: &str = "X-Organization-Id";

/// A request before it is turned into an envelope
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path, may carry its own `?query`
    pub path: String,
    pub query: Option<QueryValue>,
    pub body: Option<Body>,
    /// Fixed `X-Time` instead of the synchronized clock
    pub explicit_time: Option<i64>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            explicit_time: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: impl Into<QueryValue>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_optional_query(mut self, query: Option<QueryValue>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn at_time(mut self, millis: i64) -> Self {
        self.explicit_time = Some(millis);
        self
    }
}

/// NiceHash request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub request_id: String,
    pub user_agent: String,
    /// Decimal epoch milliseconds
    pub time: String,
    /// Always equal to `request_id`
    pub nonce: String,
    pub user_language: String,
    /// Present only when the client has credentials
    pub auth: Option<String>,
    /// Present (possibly empty) whenever `auth` is
    pub organization: Option<String>,
}

impl SignedHeaders {
    /// Header name/value pairs in send order
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            (HEADER_REQUEST_ID, self.request_id.as_str()),
            (HEADER_USER_AGENT, self.user_agent.as_str()),
            (HEADER_TIME, self.time.as_str()),
            (HEADER_NONCE, self.nonce.as_str()),
            (HEADER_USER_LANG, self.user_language.as_str()),
        ];
        if let Some(auth) = &self.auth {
            pairs.push((HEADER_AUTH, auth.as_str()));
        }
        if let Some(organization) = &self.organization {
            pairs.push((HEADER_ORGANIZATION, organization.as_str()));
        }
        pairs
    }
}

/// A request ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub method: Method,
    /// Host, path and encoded query
    pub url: String,
    /// Encoded query, as signed
    pub query: Option<String>,
    /// Serialized body, as signed
    pub body: Option<String>,
    /// `None` for bare requests such as the server time call
    pub signed_headers: Option<SignedHeaders>,
}

impl Envelope {
    /// A request without NiceHash headers
    pub fn plain(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: None,
            body: None,
            signed_headers: None,
        }
    }

    /// Look up a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.signed_headers.as_ref().and_then(|headers| {
            headers
                .to_pairs()
                .into_iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }
}

/// Build the envelope for a request
///
/// Fails with [`crate::RestError::ClockNotSynchronized`] before the first
/// sync. A query embedded in `spec.path` is merged with `spec.query`; the
/// signature covers the bare path with the merged query passed separately.
pub fn build(
    config: &ClientConfig,
    session: &SessionState,
    spec: RequestSpec,
) -> RestResult<Envelope> {
    let time = session.timestamp(spec.explicit_time)?.to_string();

    let (path_only, path_query) = query::split_path(&spec.path);
    let query = query::merge(path_query, spec.query)?.map(|q| q.encode());
    let body = spec.body.as_ref().and_then(Body::encode);

    let nonce = generate_nonce();
    let mut headers = SignedHeaders {
        request_id: nonce.clone(),
        user_agent: config
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string()),
        time,
        nonce,
        user_language: config.locale.clone(),
        auth: None,
        organization: None,
    };

    if let Some(credentials) = &config.credentials {
        let request = SigningRequest::new(spec.method.as_str(), path_only)
            .with_query(query.as_deref())
            .with_body(body.as_deref());
        headers.auth = Some(credentials.sign(&headers.time, &headers.nonce, &request));
        headers.organization = Some(credentials.organization_id().to_string());
    }

    let mut url = format!("{}{}", config.api_host, path_only);
    if let Some(query) = query.as_deref().filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }

    Ok(Envelope {
        method: spec.method,
        url,
        query,
        body,
        signed_headers: Some(headers),
    })
}
