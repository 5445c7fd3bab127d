//! External miner endpoints
//!
//! Statistics for rigs mining to a BTC address that is not tied to a
//! NiceHash account. No authentication is needed.

use super::mining::DEFAULT_ALGORITHM;
use super::segment;
use crate::client::NiceHashClient;
use crate::error::RestResult;
use crate::query::{QueryBuilder, QueryValue};
use serde_json::Value;
use tracing::instrument;

/// External miner endpoints
pub struct ExternalMinerEndpoints<'a> {
    client: &'a NiceHashClient,
}

impl<'a> ExternalMinerEndpoints<'a> {
    pub fn new(client: &'a NiceHashClient) -> Self {
        Self { client }
    }

    async fn get(
        &self,
        btc_address: &str,
        route: &str,
        query: Option<QueryValue>,
    ) -> RestResult<Value> {
        let path = format!(
            "/main/api/v2/mining/external/{}/{}",
            segment(btc_address),
            route
        );
        self.client.get(&path, query).await
    }

    /// Rigs of an address
    #[instrument(skip(self))]
    pub async fn get_rigs(
        &self,
        btc_address: &str,
        size: Option<u32>,
        page: Option<u32>,
        sort: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("size", size.unwrap_or(25))
            .param("page", page.unwrap_or(0))
            .param("sort", sort.unwrap_or("NAME"))
            .build();
        self.get(btc_address, "rigs2", query).await
    }

    /// Active workers of an address
    #[instrument(skip(self))]
    pub async fn get_active_workers(
        &self,
        btc_address: &str,
        size: Option<u32>,
        page: Option<u32>,
        sort_parameter: Option<&str>,
        sort_direction: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("size", size.unwrap_or(25))
            .param("page", page.unwrap_or(0))
            .param("sortParameter", sort_parameter.unwrap_or("RIG_NAME"))
            .param("sortDirection", sort_direction.unwrap_or("ASC"))
            .build();
        self.get(btc_address, "rigs/activeWorkers", query).await
    }

    /// Algorithm statistics stream
    #[instrument(skip(self))]
    pub async fn get_stats_algo_stream(
        &self,
        btc_address: &str,
        algorithm: Option<u32>,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("algorithm", algorithm.unwrap_or(DEFAULT_ALGORITHM))
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.get(btc_address, "rigs/stats/algo", query).await
    }

    /// Unpaid statistics stream
    #[instrument(skip(self))]
    pub async fn get_stats_unpaid_stream(
        &self,
        btc_address: &str,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.get(btc_address, "rigs/stats/unpaid", query).await
    }

    /// Payouts to an address
    #[instrument(skip(self))]
    pub async fn get_withdrawals(
        &self,
        btc_address: &str,
        after_timestamp: Option<i64>,
        size: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("afterTimestamp", after_timestamp)
            .param("size", size.unwrap_or(100))
            .param("page", page.unwrap_or(0))
            .build();
        self.get(btc_address, "rigs/withdrawals", query).await
    }
}
