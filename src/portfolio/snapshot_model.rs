use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::SleeveType;
use crate::utils::decimal_serde::decimal_serde;

/// Amount and weight of one sleeve within a snapshot. Weight is a percentage
/// of total value, rounded to 4 decimal places half-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleeveAllocation {
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub weight: Decimal,
}

/// Per-item detail retained for audit alongside the sleeve totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingDetail {
    pub sleeve: SleeveType,
    pub instrument_code: Option<String>,
    pub instrument_name: Option<String>,
    #[serde(with = "decimal_serde")]
    pub current_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub return_rate: Decimal,
}

/// Aggregated view of a customer's IRP portfolio at a point in time.
/// Derived from holdings; reproducible bit-for-bit for the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    pub cash: SleeveAllocation,
    pub deposit: SleeveAllocation,
    pub fund: SleeveAllocation,
    pub items: Vec<HoldingDetail>,
    pub generated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn sleeve(&self, sleeve: SleeveType) -> &SleeveAllocation {
        match sleeve {
            SleeveType::Cash => &self.cash,
            SleeveType::Deposit => &self.deposit,
            SleeveType::Fund => &self.fund,
        }
    }

    pub fn weight_for(&self, sleeve: SleeveType) -> Decimal {
        self.sleeve(sleeve).weight
    }

    pub fn amount_for(&self, sleeve: SleeveType) -> Decimal {
        self.sleeve(sleeve).amount
    }

    pub fn is_empty(&self) -> bool {
        self.total_value.is_zero()
    }
}
