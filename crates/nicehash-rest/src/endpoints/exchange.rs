//! Public exchange endpoints
//!
//! These endpoints don't require authentication.

use crate::client::NiceHashClient;
use crate::clock::local_time_millis;
use crate::error::RestResult;
use crate::query::QueryBuilder;
use serde_json::Value;
use tracing::{debug, instrument};

const INFO_BASE: &str = "/exchange/api/v2/info";

/// Public exchange endpoints
pub struct ExchangePublicEndpoints<'a> {
    client: &'a NiceHashClient,
}

impl<'a> ExchangePublicEndpoints<'a> {
    pub fn new(client: &'a NiceHashClient) -> Self {
        Self { client }
    }

    /// Candlesticks for a market
    ///
    /// # Arguments
    /// * `market` - Market symbol, e.g. "ETHBTC"
    /// * `to` - Upper bound in epoch milliseconds, now when unset
    /// * `resolution` - Candle size in minutes, 1 when unset
    #[instrument(skip(self))]
    pub async fn get_candlesticks(
        &self,
        market: &str,
        to: Option<i64>,
        from: Option<i64>,
        count_back: Option<u32>,
        resolution: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("market", market)
            .param("to", to.unwrap_or_else(local_time_millis))
            .opt("from", from)
            .opt("countBack", count_back)
            .param("resolution", resolution.unwrap_or(1))
            .build();
        debug!("Fetching candlesticks");
        self.client
            .get(&format!("{}/candlesticks", INFO_BASE), query)
            .await
    }

    /// 24h statistics of every market
    #[instrument(skip(self))]
    pub async fn get_market_stats(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/marketStats", INFO_BASE), None)
            .await
    }

    /// Last price of every market
    #[instrument(skip(self))]
    pub async fn get_prices(&self) -> RestResult<Value> {
        debug!("Fetching prices");
        self.client
            .get(&format!("{}/prices", INFO_BASE), None)
            .await
    }

    /// Trading status of every market
    #[instrument(skip(self))]
    pub async fn get_exchange_status(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/status", INFO_BASE), None)
            .await
    }

    /// Recent trades of a market
    #[instrument(skip(self))]
    pub async fn get_trades(
        &self,
        market: &str,
        sort_direction: Option<&str>,
        limit: Option<u32>,
        timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("market", market)
            .param("sortDirection", sort_direction.unwrap_or("DESC"))
            .param("limit", limit.unwrap_or(25))
            .opt("timestamp", timestamp)
            .build();
        self.client
            .get(&format!("{}/trades", INFO_BASE), query)
            .await
    }

    /// Order book of a market
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, market: &str, limit: Option<u32>) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("market", market)
            .param("limit", limit.unwrap_or(25))
            .build();
        self.client.get("/exchange/api/v2/orderbook", query).await
    }
}
