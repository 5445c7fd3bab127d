//! Private mining endpoints
//!
//! Rigs, groups and statistics of the authenticated account.

use super::segment;
use crate::client::NiceHashClient;
use crate::error::RestResult;
use crate::query::QueryBuilder;
use serde_json::Value;
use tracing::{debug, instrument};

const BASE: &str = "/main/api/v2/mining";

/// Algorithm id used when none is given (`DAGGERHASHIMOTO`)
pub const DEFAULT_ALGORITHM: u32 = 20;

/// Private mining endpoints
pub struct MinerPrivateEndpoints<'a> {
    client: &'a NiceHashClient,
}

impl<'a> MinerPrivateEndpoints<'a> {
    pub fn new(client: &'a NiceHashClient) -> Self {
        Self { client }
    }

    /// BTC mining address of the account
    #[instrument(skip(self))]
    pub async fn get_mining_address(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/miningAddress", BASE), None)
            .await
    }

    /// Per-algorithm statistics, optionally for a single rig
    #[instrument(skip(self))]
    pub async fn get_rig_stats_algo(&self, rig_id: Option<&str>) -> RestResult<Value> {
        let query = QueryBuilder::new().opt("rigId", rig_id).build();
        self.client.get(&format!("{}/algo/stats", BASE), query).await
    }

    /// Rig groups
    #[instrument(skip(self))]
    pub async fn get_groups_list(&self, extended_response: bool) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("extendedResponse", extended_response)
            .build();
        self.client.get(&format!("{}/groups/list", BASE), query).await
    }

    /// Algorithm statistics stream for one rig
    #[instrument(skip(self))]
    pub async fn get_rig_stats_algo_stream(
        &self,
        rig_id: &str,
        algorithm: Option<u32>,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("rigId", rig_id)
            .param("algorithm", algorithm.unwrap_or(DEFAULT_ALGORITHM))
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.client
            .get(&format!("{}/rig/stats/algo", BASE), query)
            .await
    }

    /// Unpaid statistics stream for one rig
    #[instrument(skip(self))]
    pub async fn get_rig_stats_unpaid_stream(
        &self,
        rig_id: &str,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("rigId", rig_id)
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.client
            .get(&format!("{}/rig/stats/unpaid", BASE), query)
            .await
    }

    /// Details of one rig
    #[instrument(skip(self))]
    pub async fn get_rig_information(&self, rig_id: &str) -> RestResult<Value> {
        let path = format!("{}/rig2/{}", BASE, segment(rig_id));
        self.client.get(&path, None).await
    }

    /// Active workers
    #[instrument(skip(self))]
    pub async fn get_active_workers(
        &self,
        size: Option<u32>,
        page: Option<u32>,
        sort_parameter: Option<&str>,
        sort_direction: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("size", size.unwrap_or(100))
            .param("page", page.unwrap_or(0))
            .param("sortParameter", sort_parameter.unwrap_or("RIG_NAME"))
            .param("sortDirection", sort_direction.unwrap_or("ASC"))
            .build();
        self.client
            .get(&format!("{}/rigs/activeWorkers", BASE), query)
            .await
    }

    /// Mining payouts
    #[instrument(skip(self))]
    pub async fn get_payouts(
        &self,
        size: Option<u32>,
        page: Option<u32>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("size", size.unwrap_or(10))
            .param("page", page.unwrap_or(0))
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.client
            .get(&format!("{}/rigs/payouts", BASE), query)
            .await
    }

    /// Algorithm statistics stream for all rigs
    #[instrument(skip(self))]
    pub async fn get_stats_algo_stream(
        &self,
        algorithm: Option<u32>,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("algorithm", algorithm.unwrap_or(DEFAULT_ALGORITHM))
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.client
            .get(&format!("{}/rigs/stats/algo", BASE), query)
            .await
    }

    /// Unpaid statistics stream for all rigs
    #[instrument(skip(self))]
    pub async fn get_stats_unpaid_stream(
        &self,
        after_timestamp: Option<i64>,
        before_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("afterTimestamp", after_timestamp)
            .opt("beforeTimestamp", before_timestamp)
            .build();
        self.client
            .get(&format!("{}/rigs/stats/unpaid", BASE), query)
            .await
    }

    /// Start, stop or reconfigure rigs
    ///
    /// `parameters` is the JSON body as documented by NiceHash, e.g.
    /// `{"rigId": "...", "action": "START"}`.
    #[instrument(skip(self, parameters))]
    pub async fn set_rigs(&self, parameters: Value) -> RestResult<Value> {
        debug!("Updating rig status");
        self.client
            .post(&format!("{}/rigs/status2", BASE), parameters)
            .await
    }

    /// Rigs and their status
    #[instrument(skip(self))]
    pub async fn get_rigs(
        &self,
        size: Option<u32>,
        page: Option<u32>,
        path: Option<&str>,
        sort: Option<&str>,
        system: Option<&str>,
        status: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("size", size.unwrap_or(25))
            .param("page", page.unwrap_or(0))
            .opt("path", path)
            .param("sort", sort.unwrap_or("NAME"))
            .opt("system", system)
            .opt("status", status)
            .build();
        self.client.get(&format!("{}/rigs2", BASE), query).await
    }
}
