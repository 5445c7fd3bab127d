//! Hashpower marketplace endpoints
//!
//! Order management requires authentication; the `/public` routes do not.

use super::segment;
use crate::client::NiceHashClient;
use crate::clock::local_time_millis;
use crate::error::RestResult;
use crate::query::QueryBuilder;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, instrument};

const BASE: &str = "/main/api/v2/hashpower";
const PUBLIC_BASE: &str = "/main/api/v2/public";

/// Filters for [`HashPowerEndpoints::get_my_orders`]
#[derive(Debug, Clone, Default)]
pub struct MyOrdersFilter<'a> {
    /// Comparison against `ts`, "GT" when unset
    pub op: Option<&'a str>,
    /// Page size, 100 when unset
    pub limit: Option<u32>,
    /// Epoch milliseconds, now when unset
    pub ts: Option<i64>,
    pub algorithm: Option<&'a str>,
    pub status: Option<&'a str>,
    pub active: Option<bool>,
    pub market: Option<&'a str>,
}

/// Hashpower endpoints
pub struct HashPowerEndpoints<'a> {
    client: &'a NiceHashClient,
}

impl<'a> HashPowerEndpoints<'a> {
    pub fn new(client: &'a NiceHashClient) -> Self {
        Self { client }
    }

    fn order_path(id: &str) -> String {
        format!("{}/order/{}", BASE, segment(id))
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Orders of the account
    #[instrument(skip(self))]
    pub async fn get_my_orders(&self, filter: MyOrdersFilter<'_>) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("op", filter.op.unwrap_or("GT"))
            .param("limit", filter.limit.unwrap_or(100))
            .opt("algorithm", filter.algorithm)
            .param("ts", filter.ts.unwrap_or_else(local_time_millis))
            .opt("status", filter.status)
            .opt("active", filter.active)
            .opt("market", filter.market)
            .build();
        self.client.get(&format!("{}/myOrders", BASE), query).await
    }

    /// Place a new order
    ///
    /// `parameters` is the order JSON as documented by NiceHash.
    #[instrument(skip(self, parameters))]
    pub async fn create_order(&self, parameters: Value) -> RestResult<Value> {
        debug!("Creating hashpower order");
        self.client.post(&format!("{}/order", BASE), parameters).await
    }

    /// A single order
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> RestResult<Value> {
        self.client.get(&Self::order_path(id), None).await
    }

    /// Cancel an order
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> RestResult<Value> {
        debug!("Cancelling hashpower order");
        self.client.delete(&Self::order_path(id)).await
    }

    /// Add funds to an order
    #[instrument(skip(self))]
    pub async fn refill_order(&self, id: &str, amount: Decimal) -> RestResult<Value> {
        let body = json!({ "amount": amount.to_string() });
        self.client
            .post(&format!("{}/refill", Self::order_path(id)), body)
            .await
    }

    /// Statistics stream of an order
    #[instrument(skip(self))]
    pub async fn get_order_stats(
        &self,
        id: &str,
        after_timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("afterTimestamp", after_timestamp)
            .build();
        self.client
            .get(&format!("{}/stats", Self::order_path(id)), query)
            .await
    }

    /// Change price and speed limit of an order
    #[instrument(skip(self, parameters))]
    pub async fn update_price_and_limit(&self, id: &str, parameters: Value) -> RestResult<Value> {
        self.client
            .post(&format!("{}/updatePriceAndLimit", Self::order_path(id)), parameters)
            .await
    }

    /// Estimated duration for an order
    #[instrument(skip(self, parameters))]
    pub async fn calculate_estimate_duration(&self, parameters: Value) -> RestResult<Value> {
        self.client
            .post(&format!("{}/orders/calculateEstimateDuration", BASE), parameters)
            .await
    }

    /// Order book of an algorithm
    #[instrument(skip(self))]
    pub async fn get_order_book(
        &self,
        algorithm: &str,
        size: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("algorithm", algorithm)
            .param("size", size.unwrap_or(100))
            .param("page", page.unwrap_or(0))
            .build();
        self.client.get(&format!("{}/orderBook", BASE), query).await
    }

    /// Accepted and total speed per algorithm
    #[instrument(skip(self))]
    pub async fn get_order_summaries(
        &self,
        market: Option<&str>,
        algorithm: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("market", market)
            .opt("algorithm", algorithm)
            .build();
        self.client
            .get(&format!("{}/orders/summaries", BASE), query)
            .await
    }

    /// Accepted and total speed for one algorithm and market
    #[instrument(skip(self))]
    pub async fn get_order_summary(&self, market: &str, algorithm: &str) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("market", market)
            .param("algorithm", algorithm)
            .build();
        self.client
            .get(&format!("{}/orders/summary", BASE), query)
            .await
    }

    // ========================================================================
    // Public
    // ========================================================================

    /// Price and speed history of an algorithm
    #[instrument(skip(self))]
    pub async fn get_algo_history(&self, algorithm: &str) -> RestResult<Value> {
        let query = QueryBuilder::new().param("algorithm", algorithm).build();
        self.client
            .get(&format!("{}/algo/history", PUBLIC_BASE), query)
            .await
    }

    /// Order limits per algorithm
    #[instrument(skip(self))]
    pub async fn get_buy_info(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/buy/info", PUBLIC_BASE), None)
            .await
    }

    /// Public order list
    #[instrument(skip(self))]
    pub async fn get_orders(
        &self,
        algorithm: Option<&str>,
        market: Option<&str>,
        op: Option<&str>,
        timestamp: Option<i64>,
        page: Option<u32>,
        size: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("algorithm", algorithm)
            .opt("market", market)
            .opt("op", op)
            .opt("timestamp", timestamp)
            .param("page", page.unwrap_or(0))
            .param("size", size.unwrap_or(100))
            .build();
        self.client
            .get(&format!("{}/orders", PUBLIC_BASE), query)
            .await
    }

    /// Current multi-algorithm prices
    #[instrument(skip(self))]
    pub async fn get_simple_status(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/simplemultialgo/info", PUBLIC_BASE), None)
            .await
    }

    /// Global statistics over the last 24 hours
    #[instrument(skip(self))]
    pub async fn get_stats_24h(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/stats/global/24h", PUBLIC_BASE), None)
            .await
    }

    /// Current global statistics
    #[instrument(skip(self))]
    pub async fn get_stats_current(&self) -> RestResult<Value> {
        self.client
            .get(&format!("{}/stats/global/current", PUBLIC_BASE), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{client, sent};
    use super::*;
    use crate::types::Method;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_my_orders_defaults() {
        let (client, transport) = client();
        transport.push_response(200, "{}");

        client
            .hashpower()
            .get_my_orders(MyOrdersFilter {
                ts: Some(1700000000000),
                algorithm: Some("SHA256"),
                active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            sent(&transport).query.as_deref(),
            Some("op=GT&limit=100&algorithm=SHA256&ts=1700000000000&active=true")
        );
    }

    #[tokio::test]
    async fn test_my_orders_ts_defaults_to_now() {
        let (client, transport) = client();
        transport.push_response(200, "{}");

        let before = local_time_millis();
        client
            .hashpower()
            .get_my_orders(MyOrdersFilter::default())
            .await
            .unwrap();

        let query = sent(&transport).query.unwrap();
        let ts: i64 = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("ts="))
            .unwrap()
            .parse()
            .unwrap();
        assert!(ts >= before);
    }

    #[tokio::test]
    async fn test_order_routes() {
        let (client, transport) = client();
        for _ in 0..3 {
            transport.push_response(200, "{}");
        }

        let hashpower = client.hashpower();
        hashpower.get_order("o-1").await.unwrap();
        hashpower.delete_order("o-1").await.unwrap();
        hashpower.get_order_stats("o-1", Some(5)).await.unwrap();

        let sent: Vec<(Method, String)> = transport
            .take_sent()
            .into_iter()
            .map(|e| (e.method, e.url))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::Get, "https://mock.test/main/api/v2/hashpower/order/o-1".to_string()),
                (Method::Delete, "https://mock.test/main/api/v2/hashpower/order/o-1".to_string()),
                (
                    Method::Get,
                    concat!(
                        "https://mock.test/main/api/v2/hashpower/order/o-1/stats",
                        "?afterTimestamp=5"
                    )
                    .to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_refill_order_body() {
        let (client, transport) = client();
        transport.push_response(200, "{}");

        client.hashpower().refill_order("o-1", dec!(0.005)).await.unwrap();

        let envelope = sent(&transport);
        assert_eq!(envelope.url, "https://mock.test/main/api/v2/hashpower/order/o-1/refill");
        assert_eq!(envelope.body.as_deref(), Some(r#"{"amount":"0.005"}"#));
    }

    #[tokio::test]
    async fn test_update_price_and_limit() {
        let (client, transport) = client();
        transport.push_response(200, "{}");

        client
            .hashpower()
            .update_price_and_limit("o-1", json!({"price": "1.2", "limit": "0.5"}))
            .await
            .unwrap();

        let envelope = sent(&transport);
        assert_eq!(envelope.method, Method::Post);
        assert!(envelope.url.ends_with("/order/o-1/updatePriceAndLimit"));
    }

    #[tokio::test]
    async fn test_public_routes() {
        let (client, transport) = client();
        transport.push_response(200, "{}");
        transport.push_response(200, "{}");

        client.hashpower().get_stats_24h().await.unwrap();
        client
            .hashpower()
            .get_orders(Some("SCRYPT"), Some("EU"), None, None, None, None)
            .await
            .unwrap();

        let urls: Vec<String> = transport.take_sent().into_iter().map(|e| e.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://mock.test/main/api/v2/public/stats/global/24h",
                concat!(
                    "https://mock.test/main/api/v2/public/orders",
                    "?algorithm=SCRYPT&market=EU&page=0&size=100"
                ),
            ]
        );
    }
}
