use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{WEIGHT_PRECISION, WEIGHT_SUM_TOLERANCE};
use crate::holdings::SleeveType;
use crate::utils::decimal_serde::decimal_serde;
use crate::{Error, Result};

use super::allocation_errors::AllocationError;

/// Target sleeve-weight vector, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocation {
    #[serde(with = "decimal_serde")]
    pub cash: Decimal,
    #[serde(with = "decimal_serde")]
    pub deposit: Decimal,
    #[serde(with = "decimal_serde")]
    pub fund: Decimal,
}

impl TargetAllocation {
    pub fn new(cash: Decimal, deposit: Decimal, fund: Decimal) -> Self {
        Self {
            cash,
            deposit,
            fund,
        }
    }

    pub fn weight_for(&self, sleeve: SleeveType) -> Decimal {
        match sleeve {
            SleeveType::Cash => self.cash,
            SleeveType::Deposit => self.deposit,
            SleeveType::Fund => self.fund,
        }
    }

    /// Each weight must be non-negative and the vector must sum to 100
    /// within tolerance. Never renormalizes a bad vector.
    pub fn validate(&self) -> Result<()> {
        for sleeve in [SleeveType::Cash, SleeveType::Deposit, SleeveType::Fund] {
            let weight = self.weight_for(sleeve);
            if weight.is_sign_negative() {
                return Err(Error::Allocation(AllocationError::InvalidVector(format!(
                    "{} weight is negative: {}",
                    sleeve.as_str(),
                    weight
                ))));
            }
        }

        let sum = self.cash + self.deposit + self.fund;
        let tolerance = Decimal::from_str(WEIGHT_SUM_TOLERANCE).unwrap_or(Decimal::ZERO);
        if (sum - Decimal::ONE_HUNDRED).abs() > tolerance {
            return Err(Error::Allocation(AllocationError::InvalidVector(format!(
                "Weights must sum to 100%, got {}",
                sum
            ))));
        }
        Ok(())
    }

    /// Weighted combination of two vectors, rounded per sleeve.
    pub fn blend(&self, other: &TargetAllocation, weights: &BlendWeights) -> TargetAllocation {
        let mix = |a: Decimal, b: Decimal| {
            (a * weights.model + b * weights.peer)
                .round_dp_with_strategy(WEIGHT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        };
        TargetAllocation {
            cash: mix(self.cash, other.cash),
            deposit: mix(self.deposit, other.deposit),
            fund: mix(self.fund, other.fund),
        }
    }
}

/// Blend factors for the model and peer inputs. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendWeights {
    #[serde(with = "decimal_serde")]
    pub model: Decimal,
    #[serde(with = "decimal_serde")]
    pub peer: Decimal,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            model: dec!(0.6),
            peer: dec!(0.4),
        }
    }
}

/// How a target vector should be produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStrategy {
    /// Risk-profile policy table only.
    Model,
    /// Policy table blended with the peer-similarity recommendation.
    Blended { weights: BlendWeights },
}

/// Resolved target plus the inputs that produced it, kept for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationDecision {
    pub target: TargetAllocation,
    pub model_input: Option<TargetAllocation>,
    pub peer_input: Option<TargetAllocation>,
    pub blend_weights: Option<BlendWeights>,
    pub source: String,
}

impl AllocationDecision {
    pub fn manual(target: TargetAllocation) -> Self {
        Self {
            target,
            model_input: None,
            peer_input: None,
            blend_weights: None,
            source: "MANUAL".to_string(),
        }
    }
}
