use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::allocation::TargetAllocation;
use crate::constants::{
    CASH_DRIFT_THRESHOLD, DECIMAL_PRECISION, DEFAULT_FEE_BPS, DEFAULT_FEE_MINIMUM,
    DEPOSIT_DRIFT_THRESHOLD, FUND_DRIFT_THRESHOLD, MIN_ORDER_AMOUNT, UNIT_PRECISION,
};
use crate::holdings::{Holding, SleeveType};
use crate::portfolio::PortfolioSnapshot;
use crate::Result;

use super::rebalancing_model::{OrderType, RebalancingOrder, TriggerType};

/// Per-sleeve drift thresholds in percentage points. The band is a deliberate
/// hysteresis: rounding noise inside the band never triggers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandThresholds {
    pub cash: Decimal,
    pub deposit: Decimal,
    pub fund: Decimal,
}

impl BandThresholds {
    pub fn for_sleeve(&self, sleeve: SleeveType) -> Decimal {
        match sleeve {
            SleeveType::Cash => self.cash,
            SleeveType::Deposit => self.deposit,
            SleeveType::Fund => self.fund,
        }
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            cash: Decimal::from_str(CASH_DRIFT_THRESHOLD).unwrap_or(Decimal::TWO),
            deposit: Decimal::from_str(DEPOSIT_DRIFT_THRESHOLD).unwrap_or(Decimal::ONE),
            fund: Decimal::from_str(FUND_DRIFT_THRESHOLD).unwrap_or(Decimal::ONE),
        }
    }
}

/// Pluggable order-fee computation.
pub trait FeePolicy: Send + Sync {
    fn fee_for(&self, order_type: OrderType, notional: Decimal) -> Decimal;
    fn name(&self) -> &'static str;
}

/// Basis points on notional with a floor.
#[derive(Debug, Clone)]
pub struct BasisPointFeePolicy {
    pub bps: Decimal,
    pub minimum: Decimal,
}

impl Default for BasisPointFeePolicy {
    fn default() -> Self {
        Self {
            bps: Decimal::from_str(DEFAULT_FEE_BPS).unwrap_or(Decimal::TEN),
            minimum: Decimal::from_str(DEFAULT_FEE_MINIMUM).unwrap_or(Decimal::ZERO),
        }
    }
}

impl FeePolicy for BasisPointFeePolicy {
    fn fee_for(&self, _order_type: OrderType, notional: Decimal) -> Decimal {
        let fee = (notional * self.bps / Decimal::from(10_000)).round_dp(DECIMAL_PRECISION);
        fee.max(self.minimum)
    }

    fn name(&self) -> &'static str {
        "BASIS_POINTS"
    }
}

/// Fund a BUY order should be routed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSelection {
    pub fund_code: String,
    pub fund_name: String,
    pub class_code: Option<String>,
    pub expected_nav: Decimal,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub thresholds: BandThresholds,
    pub min_order_amount: Decimal,
    /// BUY target when the customer holds no fund to scale up.
    pub default_fund: Option<FundSelection>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            thresholds: BandThresholds::default(),
            min_order_amount: Decimal::from_str(MIN_ORDER_AMOUNT).unwrap_or(Decimal::ZERO),
            default_fund: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RebalancingPlan {
    pub orders: Vec<RebalancingOrder>,
    pub total_fee: Decimal,
}

impl RebalancingPlan {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

pub struct RebalancingPlanner {
    config: PlannerConfig,
    fee_policy: Arc<dyn FeePolicy>,
}

impl RebalancingPlanner {
    pub fn new(config: PlannerConfig, fee_policy: Arc<dyn FeePolicy>) -> Self {
        Self { config, fee_policy }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            PlannerConfig::default(),
            Arc::new(BasisPointFeePolicy::default()),
        )
    }

    pub fn thresholds(&self) -> &BandThresholds {
        &self.config.thresholds
    }

    /// Sleeves whose |current − target| strictly exceeds their band.
    pub fn band_breaches(
        &self,
        current: &PortfolioSnapshot,
        target: &TargetAllocation,
    ) -> Vec<(SleeveType, Decimal)> {
        [SleeveType::Cash, SleeveType::Deposit, SleeveType::Fund]
            .into_iter()
            .filter_map(|sleeve| {
                let drift = (current.weight_for(sleeve) - target.weight_for(sleeve)).abs();
                if drift > self.config.thresholds.for_sleeve(sleeve) {
                    Some((sleeve, drift))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn exceeds_band(&self, current: &PortfolioSnapshot, target: &TargetAllocation) -> bool {
        !self.band_breaches(current, target).is_empty()
    }

    /// Generates the order list moving the portfolio toward target.
    ///
    /// Only the fund sleeve trades: deposit subscriptions are bank products
    /// outside order routing, and cash absorbs the residual. SELL orders come
    /// before BUY orders so liquidation proceeds notionally fund purchases.
    pub fn plan(
        &self,
        job_id: &str,
        trigger_type: TriggerType,
        holdings: &[Holding],
        current: &PortfolioSnapshot,
        target: &TargetAllocation,
        buy_selection: Option<&FundSelection>,
    ) -> Result<RebalancingPlan> {
        let total_value = current.total_value;
        let mut orders = Vec::new();

        if total_value.is_zero() {
            return Ok(RebalancingPlan {
                orders,
                total_fee: Decimal::ZERO,
            });
        }

        let current_fund = current.weight_for(SleeveType::Fund);
        let target_fund = target.weight_for(SleeveType::Fund);
        let fund_delta = ((target_fund - current_fund) / Decimal::ONE_HUNDRED * total_value)
            .round_dp(DECIMAL_PRECISION);

        let reason = format!(
            "{} trigger: fund weight {:.2}% -> target {:.2}%",
            trigger_type.as_str(),
            current_fund,
            target_fund,
        );

        if fund_delta < Decimal::ZERO {
            self.plan_sells(job_id, holdings, -fund_delta, &reason, &mut orders);
        } else if fund_delta > Decimal::ZERO {
            self.plan_buy(job_id, holdings, fund_delta, &reason, buy_selection, &mut orders);
        }

        let total_fee = orders.iter().map(|o| o.fee).sum();
        Ok(RebalancingPlan { orders, total_fee })
    }

    /// SELLs are spread pro-rata across open fund holdings by current value,
    /// keeping relative fund composition unchanged.
    fn plan_sells(
        &self,
        job_id: &str,
        holdings: &[Holding],
        sell_amount: Decimal,
        reason: &str,
        orders: &mut Vec<RebalancingOrder>,
    ) {
        let funds: Vec<&Holding> = holdings
            .iter()
            .filter(|h| h.sleeve == SleeveType::Fund && h.status.is_open())
            .collect();

        let fund_total: Decimal = funds.iter().map(|h| h.current_value).sum();
        if fund_total.is_zero() {
            warn!("sell of {} requested but no open fund holdings", sell_amount);
            return;
        }

        for holding in funds {
            let share = (sell_amount * holding.current_value / fund_total)
                .round_dp(DECIMAL_PRECISION);
            if share < self.config.min_order_amount {
                debug!(
                    "dropping sell of {} for {} below minimum {}",
                    share,
                    holding.instrument_code.as_deref().unwrap_or("?"),
                    self.config.min_order_amount
                );
                continue;
            }

            let nav = match holding.current_nav {
                Some(nav) if nav > Decimal::ZERO => nav,
                _ => {
                    warn!(
                        "no NAV for fund holding {}, skipping sell",
                        holding.id
                    );
                    continue;
                }
            };

            // Never sell more units than held: floor and cap.
            let mut units = (share / nav)
                .round_dp_with_strategy(UNIT_PRECISION, RoundingStrategy::ToZero);
            if let Some(held) = holding.units {
                units = units.min(held);
            }
            if units <= Decimal::ZERO {
                continue;
            }

            let amount = (units * nav).round_dp(DECIMAL_PRECISION);
            let fee = self.fee_policy.fee_for(OrderType::Sell, amount);

            orders.push(RebalancingOrder::new(
                job_id,
                OrderType::Sell,
                holding.instrument_code.as_deref().unwrap_or_default(),
                holding.instrument_name.as_deref().unwrap_or_default(),
                None,
                nav,
                units,
                amount,
                fee,
                Some(self.fee_policy.name().to_string()),
                reason.to_string(),
            ));
        }
    }

    fn plan_buy(
        &self,
        job_id: &str,
        holdings: &[Holding],
        buy_amount: Decimal,
        reason: &str,
        buy_selection: Option<&FundSelection>,
        orders: &mut Vec<RebalancingOrder>,
    ) {
        if buy_amount < self.config.min_order_amount {
            debug!(
                "dropping buy of {} below minimum {}",
                buy_amount, self.config.min_order_amount
            );
            return;
        }

        // Route to the caller's selection, else scale up the largest existing
        // fund holding, else fall back to the configured default fund.
        let selection = buy_selection.cloned().or_else(|| {
            holdings
                .iter()
                .filter(|h| h.sleeve == SleeveType::Fund && h.status.is_open())
                .max_by_key(|h| h.current_value)
                .and_then(|h| {
                    let nav = h.current_nav?;
                    Some(FundSelection {
                        fund_code: h.instrument_code.clone()?,
                        fund_name: h.instrument_name.clone().unwrap_or_default(),
                        class_code: None,
                        expected_nav: nav,
                    })
                })
                .or_else(|| self.config.default_fund.clone())
        });

        let selection = match selection {
            Some(s) if s.expected_nav > Decimal::ZERO => s,
            _ => {
                warn!("buy of {} requested but no target fund available", buy_amount);
                return;
            }
        };

        let units = (buy_amount / selection.expected_nav)
            .round_dp_with_strategy(UNIT_PRECISION, RoundingStrategy::ToZero);
        if units <= Decimal::ZERO {
            return;
        }

        let fee = self.fee_policy.fee_for(OrderType::Buy, buy_amount);

        orders.push(RebalancingOrder::new(
            job_id,
            OrderType::Buy,
            &selection.fund_code,
            &selection.fund_name,
            selection.class_code.clone(),
            selection.expected_nav,
            units,
            buy_amount,
            fee,
            Some(self.fee_policy.name().to_string()),
            reason.to_string(),
        ));
    }
}
