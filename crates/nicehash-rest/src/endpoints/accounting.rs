//! Wallet and accounting endpoints
//!
//! All of these require authentication.

use super::segment;
use crate::client::NiceHashClient;
use crate::error::RestResult;
use crate::query::QueryBuilder;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, instrument};

const BASE: &str = "/main/api/v2/accounting";

/// Accounting endpoints
pub struct AccountingEndpoints<'a> {
    client: &'a NiceHashClient,
}

impl<'a> AccountingEndpoints<'a> {
    pub fn new(client: &'a NiceHashClient) -> Self {
        Self { client }
    }

    /// Balance of a single currency
    #[instrument(skip(self))]
    pub async fn get_balance(&self, currency: &str, extended_response: bool) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("extendedResponse", extended_response)
            .build();
        let path = format!("{}/account2/{}", BASE, segment(currency));
        debug!("Fetching balance");
        self.client.get(&path, query).await
    }

    /// Balances of all currencies
    ///
    /// # Arguments
    /// * `fiat` - Also report values in this fiat currency, e.g. "USD"
    #[instrument(skip(self))]
    pub async fn get_balances(
        &self,
        extended_response: bool,
        fiat: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("extendedResponse", extended_response)
            .opt("fiat", fiat)
            .build();
        debug!("Fetching balances");
        self.client.get(&format!("{}/accounts2", BASE), query).await
    }

    /// Account activity
    ///
    /// `stage` defaults to "ALL" and `limit` to 10.
    #[instrument(skip(self))]
    pub async fn get_activities(
        &self,
        currency: &str,
        activity_type: Option<&str>,
        timestamp: Option<i64>,
        stage: Option<&str>,
        limit: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("type", activity_type)
            .opt("timestamp", timestamp)
            .param("stage", stage.unwrap_or("ALL"))
            .param("limit", limit.unwrap_or(10))
            .build();
        let path = format!("{}/activity/{}", BASE, segment(currency));
        self.client.get(&path, query).await
    }

    /// Deposit addresses for a currency
    #[instrument(skip(self))]
    pub async fn get_deposit_addresses(
        &self,
        currency: &str,
        wallet_type: Option<&str>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("currency", currency)
            .opt("walletType", wallet_type)
            .build();
        self.client
            .get(&format!("{}/depositAddresses", BASE), query)
            .await
    }

    /// Deposit list
    ///
    /// `op` defaults to "LT", `page` to 0 and `size` to 100.
    #[instrument(skip(self))]
    pub async fn get_deposits(
        &self,
        currency: &str,
        statuses: Option<&str>,
        op: Option<&str>,
        timestamp: Option<i64>,
        page: Option<u32>,
        size: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("statuses", statuses)
            .param("op", op.unwrap_or("LT"))
            .opt("timestamp", timestamp)
            .param("page", page.unwrap_or(0))
            .param("size", size.unwrap_or(100))
            .build();
        let path = format!("{}/deposits/{}", BASE, segment(currency));
        self.client.get(&path, query).await
    }

    /// A single deposit
    #[instrument(skip(self))]
    pub async fn get_deposit(&self, currency: &str, id: &str) -> RestResult<Value> {
        let path = format!("{}/deposits2/{}/{}", BASE, segment(currency), segment(id));
        self.client.get(&path, None).await
    }

    /// Trades of an exchange order
    #[instrument(skip(self))]
    pub async fn get_exchange_order_transactions(
        &self,
        id: &str,
        exchange_market: &str,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("exchangeMarket", exchange_market)
            .build();
        let path = format!("{}/exchange/{}/trades", BASE, segment(id));
        self.client.get(&path, query).await
    }

    /// Transactions of a hashpower order
    #[instrument(skip(self))]
    pub async fn get_hashpower_order_transactions(
        &self,
        id: &str,
        limit: Option<u32>,
        timestamp: Option<i64>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .param("limit", limit.unwrap_or(100))
            .opt("timestamp", timestamp)
            .build();
        let path = format!("{}/hashpower/{}/transactions", BASE, segment(id));
        self.client.get(&path, query).await
    }

    /// Hashpower earnings
    #[instrument(skip(self))]
    pub async fn get_hashpower_earnings(
        &self,
        currency: &str,
        timestamp: Option<i64>,
        page: Option<u32>,
        size: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("timestamp", timestamp)
            .param("page", page.unwrap_or(0))
            .param("size", size.unwrap_or(100))
            .build();
        let path = format!("{}/hashpowerEarnings/{}", BASE, segment(currency));
        self.client.get(&path, query).await
    }

    /// A single transaction
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, currency: &str, transaction_id: &str) -> RestResult<Value> {
        let path = format!(
            "{}/transaction/{}/{}",
            BASE,
            segment(currency),
            segment(transaction_id)
        );
        self.client.get(&path, None).await
    }

    /// Transaction list
    #[instrument(skip(self))]
    pub async fn get_transactions(
        &self,
        currency: &str,
        transaction_type: Option<&str>,
        purposes: Option<&str>,
        op: Option<&str>,
        timestamp: Option<i64>,
        size: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("type", transaction_type)
            .opt("purposes", purposes)
            .opt("op", op)
            .opt("timestamp", timestamp)
            .param("size", size.unwrap_or(10))
            .build();
        let path = format!("{}/transactions/{}", BASE, segment(currency));
        self.client.get(&path, query).await
    }

    /// A single withdrawal
    #[instrument(skip(self))]
    pub async fn get_withdrawal(&self, currency: &str, id: &str) -> RestResult<Value> {
        let path = format!("{}/withdrawal2/{}/{}", BASE, segment(currency), segment(id));
        self.client.get(&path, None).await
    }

    /// A single whitelisted withdrawal address
    #[instrument(skip(self))]
    pub async fn get_withdrawal_address(&self, id: &str) -> RestResult<Value> {
        let path = format!("{}/withdrawalAddress/{}", BASE, segment(id));
        self.client.get(&path, None).await
    }

    /// Whitelisted withdrawal addresses
    #[instrument(skip(self))]
    pub async fn get_withdrawal_addresses(
        &self,
        currency: Option<&str>,
        address_type: Option<&str>,
        size: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("currency", currency)
            .opt("type", address_type)
            .param("size", size.unwrap_or(100))
            .param("page", page.unwrap_or(0))
            .build();
        self.client
            .get(&format!("{}/withdrawalAddresses", BASE), query)
            .await
    }

    /// Withdrawal list
    #[instrument(skip(self))]
    pub async fn get_withdrawals(
        &self,
        currency: &str,
        statuses: Option<&str>,
        op: Option<&str>,
        timestamp: Option<i64>,
        size: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Value> {
        let query = QueryBuilder::new()
            .opt("statuses", statuses)
            .param("op", op.unwrap_or("LT"))
            .opt("timestamp", timestamp)
            .param("size", size.unwrap_or(100))
            .param("page", page.unwrap_or(0))
            .build();
        let path = format!("{}/withdrawals/{}", BASE, segment(currency));
        self.client.get(&path, query).await
    }

    /// Withdraw to a whitelisted address
    ///
    /// The amount is sent as a decimal string.
    #[instrument(skip(self))]
    pub async fn create_withdrawal(
        &self,
        currency: &str,
        amount: Decimal,
        withdrawal_address_id: &str,
    ) -> RestResult<Value> {
        let body = json!({
            "currency": currency,
            "amount": amount.to_string(),
            "withdrawalAddressId": withdrawal_address_id,
        });
        debug!("Creating withdrawal");
        self.client
            .post(&format!("{}/withdrawal", BASE), body)
            .await
    }

    /// Cancel a pending withdrawal
    #[instrument(skip(self))]
    pub async fn cancel_withdrawal(&self, currency: &str, id: &str) -> RestResult<Value> {
        let path = format!("{}/withdrawal/{}/{}", BASE, segment(currency), segment(id));
        debug!("Cancelling withdrawal");
        self.client.delete(&path).await
    }
}
