use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::Result;

use super::holdings_model::{Holding, RefreshReport, SleeveType};

#[async_trait]
pub trait HoldingRepository: Send + Sync {
    /// Inserts or updates the single open holding for
    /// (customer, sleeve, instrument_code). Runs on the write actor, so
    /// concurrent upserts for the same key serialize.
    async fn upsert(&self, holding: Holding) -> Result<Holding>;

    /// Updates an existing holding by id.
    async fn save(&self, holding: Holding) -> Result<Holding>;

    async fn list_open(&self, customer_id: &str) -> Result<Vec<Holding>>;

    async fn find_open(
        &self,
        customer_id: &str,
        sleeve: SleeveType,
        instrument_code: Option<&str>,
    ) -> Result<Option<Holding>>;
}

/// Valuation service: pulls fresh market data from partner banks and applies
/// it to stored holdings, plus post-fill adjustments from order execution.
#[async_trait]
pub trait HoldingsService: Send + Sync {
    async fn refresh_cash_balance(&self, customer_id: &str) -> Result<()>;
    async fn refresh_deposit_holdings(&self, customer_id: &str) -> Result<()>;
    async fn refresh_fund_holdings(&self, customer_id: &str) -> Result<()>;

    /// Refreshes every sleeve. Gateway failures leave prior values untouched
    /// and are reported as stale sleeves; with `require_fresh` any stale
    /// sleeve is escalated to an error instead.
    async fn refresh_all(&self, customer_id: &str, require_fresh: bool) -> Result<RefreshReport>;

    async fn list_open_holdings(&self, customer_id: &str) -> Result<Vec<Holding>>;

    async fn record_buy_fill(
        &self,
        customer_id: &str,
        account_id: &str,
        fund_code: &str,
        fund_name: &str,
        units: Decimal,
        amount: Decimal,
        nav: Decimal,
    ) -> Result<Holding>;

    async fn record_sell_fill(
        &self,
        customer_id: &str,
        fund_code: &str,
        units: Decimal,
        nav: Decimal,
    ) -> Result<Holding>;
}
