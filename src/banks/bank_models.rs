use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction for a fund order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// One time-deposit position as reported by a partner bank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositHolding {
    pub product_code: String,
    pub product_name: String,
    pub principal_amount: Decimal,
    pub interest_rate: Decimal,
    pub maturity_date: NaiveDate,
}

/// One fund position as reported by a partner bank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundHolding {
    pub fund_code: String,
    pub fund_name: String,
    pub units: Decimal,
    pub current_nav: Decimal,
    pub purchase_nav: Decimal,
    pub current_value: Decimal,
}

/// Order instruction submitted to a partner bank.
/// BUY orders are denominated in amount, SELL orders in units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundOrder {
    pub side: OrderSide,
    pub fund_code: String,
    pub amount: Option<Decimal>,
    pub units: Option<Decimal>,
}

impl FundOrder {
    pub fn buy(fund_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            side: OrderSide::Buy,
            fund_code: fund_code.into(),
            amount: Some(amount),
            units: None,
        }
    }

    pub fn sell(fund_code: impl Into<String>, units: Decimal) -> Self {
        Self {
            side: OrderSide::Sell,
            fund_code: fund_code.into(),
            amount: None,
            units: Some(units),
        }
    }
}

/// Fill state reported by the bank for a submitted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillStatus {
    Filled,
    PartialFilled,
    Rejected,
}

/// Result of a fund order accepted by a partner bank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundOrderResult {
    pub bank_order_id: String,
    pub filled_nav: Decimal,
    pub filled_units: Decimal,
    pub filled_amount: Decimal,
    pub status: FillStatus,
}
