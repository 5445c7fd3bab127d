//! Server clock synchronization
//!
//! NiceHash rejects requests whose `X-Time` is too far from its own clock.
//! The client fetches the server time once, keeps `server - local` as an
//! offset and stamps every request with `local_now + offset`.
//!
//! Until the first successful sync there is no offset and every request
//! fails with [`RestError::ClockNotSynchronized`] instead of being sent
//! with a guessed time.

use crate::envelope::Envelope;
use crate::error::{RestError, RestResult};
use crate::transport::{self, HttpTransport};
use crate::types::{Method, ServerTime};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

/// Path of the server time endpoint
pub const SERVER_TIME_PATH: &str = "/api/v2/time";

/// Local wall clock, epoch milliseconds
pub fn local_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mutable per-session state
///
/// Holds the clock offset. `sync` is the only writer; request builders read
/// a snapshot.
#[derive(Debug, Default)]
pub struct SessionState {
    clock_offset: RwLock<Option<i64>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset in milliseconds, `None` before the first sync
    pub fn offset(&self) -> Option<i64> {
        *self.clock_offset.read()
    }

    /// Check if a sync has completed
    pub fn is_synced(&self) -> bool {
        self.offset().is_some()
    }

    /// Store the offset derived from a server time reading
    ///
    /// `local_time` is the local clock when the request was issued. An offset
    /// that does not fit in `i64` is rejected and the previous one is kept.
    pub fn record_server_time(&self, server_time: i64, local_time: i64) -> RestResult<i64> {
        let offset = server_time
            .checked_sub(local_time)
            .ok_or_else(|| RestError::Decode("server time out of range".to_string()))?;
        *self.clock_offset.write() = Some(offset);
        Ok(offset)
    }

    /// Timestamp for an outgoing request
    ///
    /// Uses `explicit` when given, otherwise the local clock shifted by the
    /// offset. Fails when no sync has happened yet, even with an explicit
    /// time.
    pub fn timestamp(&self, explicit: Option<i64>) -> RestResult<i64> {
        let offset = self.offset().ok_or(RestError::ClockNotSynchronized)?;
        match explicit {
            Some(millis) => Ok(millis),
            None => local_time_millis()
                .checked_add(offset)
                .ok_or_else(|| RestError::Decode("timestamp out of range".to_string())),
        }
    }
}

/// Fetch the server time and update the session offset
///
/// The offset is only written once the response has been fully parsed; on
/// any failure the previous offset stays in place.
#[instrument(skip(transport, session))]
pub async fn sync(
    transport: &dyn HttpTransport,
    api_host: &str,
    session: &SessionState,
) -> RestResult<i64> {
    let envelope = Envelope::plain(Method::Get, format!("{}{}", api_host, SERVER_TIME_PATH));

    let local_time = local_time_millis();
    let response = transport::send(transport, &envelope).await?;
    let server: ServerTime = serde_json::from_value(response)
        .map_err(|e| RestError::Decode(format!("invalid server time response: {}", e)))?;

    let offset = session.record_server_time(server.server_time, local_time)?;
    debug!(server_time = server.server_time, local_time, "Server time received");
    info!(offset_ms = offset, "Synchronized clock with NiceHash");

    Ok(offset)
}
