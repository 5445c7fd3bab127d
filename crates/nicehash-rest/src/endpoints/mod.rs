//! API endpoint groups
//!
//! Each group borrows the client and maps one method to one NiceHash route.
//! Responses are returned as untyped JSON.

pub mod accounting;
pub mod exchange;
pub mod external_miner;
pub mod hashpower;
pub mod mining;

pub use accounting::AccountingEndpoints;
pub use exchange::ExchangePublicEndpoints;
pub use external_miner::ExternalMinerEndpoints;
pub use hashpower::HashPowerEndpoints;
pub use mining::MinerPrivateEndpoints;

use std::borrow::Cow;

/// Percent-encode a value used as a path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
