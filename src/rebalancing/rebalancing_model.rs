use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::allocation::{AllocationDecision, AllocationStrategy, TargetAllocation};
use crate::constants::DECIMAL_PRECISION;
use crate::portfolio::PortfolioSnapshot;
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};
use crate::{errors::ValidationError, Error, Result};

use super::rebalancing_errors::RebalancingError;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Simulation,
    Execution,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Simulation => "SIMULATION",
            JobType::Execution => "EXECUTION",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "SIMULATION" => Ok(JobType::Simulation),
            "EXECUTION" => Ok(JobType::Execution),
            other => Err(invalid(format!("Unknown job type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// Fixed calendar schedule, unconditional simulation.
    Periodic,
    /// Drift-band trigger on a denser schedule.
    Threshold,
    Manual,
    Test,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Periodic => "PERIODIC",
            TriggerType::Threshold => "THRESHOLD",
            TriggerType::Manual => "MANUAL",
            TriggerType::Test => "TEST",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PERIODIC" => Ok(TriggerType::Periodic),
            "THRESHOLD" => Ok(TriggerType::Threshold),
            "MANUAL" => Ok(TriggerType::Manual),
            "TEST" => Ok(TriggerType::Test),
            other => Err(invalid(format!("Unknown trigger type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Approved,
    Executing,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Approved => "APPROVED",
            JobStatus::Executing => "EXECUTING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "APPROVED" => Ok(JobStatus::Approved),
            "EXECUTING" => Ok(JobStatus::Executing),
            "COMPLETED" => Ok(JobStatus::Completed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(invalid(format!("Unknown job status: {}", other))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "BUY" => Ok(OrderType::Buy),
            "SELL" => Ok(OrderType::Sell),
            other => Err(invalid(format!("Unknown order type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Submitted,
    Filled,
    PartialFilled,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Submitted => "SUBMITTED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::PartialFilled => "PARTIAL_FILLED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "SUBMITTED" => Ok(OrderStatus::Submitted),
            "FILLED" => Ok(OrderStatus::Filled),
            "PARTIAL_FILLED" => Ok(OrderStatus::PartialFilled),
            "FAILED" => Ok(OrderStatus::Failed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(invalid(format!("Unknown order status: {}", other))),
        }
    }

    pub fn is_terminal_success(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::PartialFilled)
    }
}

fn invalid(message: String) -> Error {
    Error::Validation(ValidationError::InvalidInput(message))
}

// ============================================================================
// Domain models
// ============================================================================

/// One rebalancing planning/execution unit. Orders reference the job by id
/// only; the job does not hold its orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingJob {
    pub id: String,
    pub customer_id: String,
    pub account_number: String,
    pub job_type: JobType,
    pub trigger_type: TriggerType,
    pub status: JobStatus,
    pub current_snapshot: Option<PortfolioSnapshot>,
    pub target: Option<AllocationDecision>,
    pub order_plan: Option<serde_json::Value>,
    #[serde(with = "decimal_serde")]
    pub total_fee: Decimal,
    pub failure_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl RebalancingJob {
    pub fn new_simulation(
        customer_id: &str,
        account_number: &str,
        trigger_type: TriggerType,
        current_snapshot: PortfolioSnapshot,
        target: AllocationDecision,
        order_plan: serde_json::Value,
        total_fee: Decimal,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            account_number: account_number.to_string(),
            job_type: JobType::Simulation,
            trigger_type,
            status: JobStatus::Pending,
            current_snapshot: Some(current_snapshot),
            target: Some(target),
            order_plan: Some(order_plan),
            total_fee,
            failure_reason: None,
            cancel_reason: None,
            created_at: Utc::now(),
            approved_at: None,
            executed_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }

    pub fn can_be_approved(&self) -> bool {
        self.job_type == JobType::Simulation && self.status == JobStatus::Pending
    }

    pub fn can_be_executed(&self) -> bool {
        self.job_type == JobType::Execution && self.status == JobStatus::Approved
    }

    /// Promotes an approvable simulation into an EXECUTION job in place.
    /// The plan and snapshots stay untouched.
    pub fn approve(&mut self) -> Result<()> {
        if !self.can_be_approved() {
            return Err(self.transition_error("be approved"));
        }
        self.job_type = JobType::Execution;
        self.status = JobStatus::Approved;
        self.approved_at = Some(Utc::now());
        Ok(())
    }

    pub fn start_execution(&mut self) -> Result<()> {
        if !self.can_be_executed() {
            return Err(self.transition_error("start executing"));
        }
        self.status = JobStatus::Executing;
        self.executed_at = Some(Utc::now());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        if self.status != JobStatus::Executing {
            return Err(self.transition_error("complete"));
        }
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, reason: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(self.transition_error("fail"));
        }
        self.status = JobStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Operator cancel; only before execution starts.
    pub fn cancel(&mut self, reason: &str) -> Result<()> {
        if !matches!(self.status, JobStatus::Pending | JobStatus::Approved) {
            return Err(self.transition_error("be cancelled"));
        }
        self.status = JobStatus::Cancelled;
        self.cancel_reason = Some(reason.to_string());
        self.cancelled_at = Some(Utc::now());
        Ok(())
    }

    fn transition_error(&self, action: &'static str) -> Error {
        Error::Rebalancing(RebalancingError::InvalidTransition {
            job_id: self.id.clone(),
            status: self.status.as_str().to_string(),
            action,
        })
    }
}

/// One BUY/SELL instruction within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingOrder {
    pub id: String,
    pub job_id: String,
    pub order_type: OrderType,
    pub asset_type: String,
    pub fund_code: String,
    pub fund_name: String,
    pub class_code: Option<String>,
    #[serde(with = "decimal_serde")]
    pub expected_nav: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub filled_nav: Option<Decimal>,
    #[serde(with = "decimal_serde")]
    pub order_units: Decimal,
    #[serde(with = "decimal_serde")]
    pub order_amount: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub filled_units: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub filled_amount: Option<Decimal>,
    #[serde(with = "decimal_serde")]
    pub fee: Decimal,
    pub fee_type: Option<String>,
    pub status: OrderStatus,
    pub bank_order_id: Option<String>,
    pub execution_reason: Option<String>,
    pub filled_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const ASSET_TYPE_FUND: &str = "FUND";

impl RebalancingOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job_id: &str,
        order_type: OrderType,
        fund_code: &str,
        fund_name: &str,
        class_code: Option<String>,
        expected_nav: Decimal,
        order_units: Decimal,
        order_amount: Decimal,
        fee: Decimal,
        fee_type: Option<String>,
        execution_reason: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            order_type,
            asset_type: ASSET_TYPE_FUND.to_string(),
            fund_code: fund_code.to_string(),
            fund_name: fund_name.to_string(),
            class_code,
            expected_nav,
            filled_nav: None,
            order_units,
            order_amount,
            filled_units: None,
            filled_amount: None,
            fee,
            fee_type,
            status: OrderStatus::Pending,
            bank_order_id: None,
            execution_reason: Some(execution_reason),
            filled_at: None,
            failed_at: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn submit(&mut self, bank_order_id: &str) -> Result<()> {
        if self.status != OrderStatus::Pending {
            return Err(Error::Rebalancing(RebalancingError::InvalidOrderState(
                format!("order {} already {}", self.id, self.status.as_str()),
            )));
        }
        self.status = OrderStatus::Submitted;
        self.bank_order_id = Some(bank_order_id.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn fill(&mut self, nav: Decimal, units: Decimal, amount: Decimal) -> Result<()> {
        self.apply_fill(nav, units, amount, OrderStatus::Filled)
    }

    pub fn partial_fill(&mut self, nav: Decimal, units: Decimal, amount: Decimal) -> Result<()> {
        self.apply_fill(nav, units, amount, OrderStatus::PartialFilled)
    }

    fn apply_fill(
        &mut self,
        nav: Decimal,
        units: Decimal,
        amount: Decimal,
        status: OrderStatus,
    ) -> Result<()> {
        if self.status != OrderStatus::Submitted {
            return Err(Error::Rebalancing(RebalancingError::InvalidOrderState(
                format!("cannot fill order {} in {}", self.id, self.status.as_str()),
            )));
        }
        if amount > self.order_amount {
            return Err(Error::Rebalancing(RebalancingError::InvalidOrderState(
                format!(
                    "fill amount {} exceeds order amount {} for order {}",
                    amount, self.order_amount, self.id
                ),
            )));
        }
        self.filled_nav = Some(nav);
        self.filled_units = Some(units);
        self.filled_amount = Some(amount);
        self.status = status;
        self.filled_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn fail(&mut self, reason: &str) {
        self.status = OrderStatus::Failed;
        self.failure_reason = Some(reason.to_string());
        self.failed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// filled_amount / order_amount, in [0, 1].
    pub fn fill_rate(&self) -> Decimal {
        if self.order_amount.is_zero() {
            return Decimal::ZERO;
        }
        (self.filled_amount.unwrap_or(Decimal::ZERO) / self.order_amount)
            .round_dp(DECIMAL_PRECISION)
    }
}

// ============================================================================
// Request / response models
// ============================================================================

/// Request for a new simulation. An explicit target overrides the strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub customer_id: String,
    pub trigger_type: TriggerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<AllocationStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_target: Option<TargetAllocation>,
    #[serde(default)]
    pub require_fresh: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingSimulationResponse {
    pub job_id: String,
    pub customer_id: String,
    pub job_type: JobType,
    pub trigger_type: TriggerType,
    pub status: JobStatus,
    pub current_snapshot: Option<PortfolioSnapshot>,
    pub target: Option<AllocationDecision>,
    pub orders: Vec<RebalancingOrder>,
    #[serde(with = "decimal_serde")]
    pub total_fee: Decimal,
    pub created_at: DateTime<Utc>,
}

impl RebalancingSimulationResponse {
    pub fn from_job(job: &RebalancingJob, orders: Vec<RebalancingOrder>) -> Self {
        Self {
            job_id: job.id.clone(),
            customer_id: job.customer_id.clone(),
            job_type: job.job_type,
            trigger_type: job.trigger_type,
            status: job.status,
            current_snapshot: job.current_snapshot.clone(),
            target: job.target.clone(),
            orders,
            total_fee: job.total_fee,
            created_at: job.created_at,
        }
    }
}

/// Filtered, paginated job-history query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub trigger_type: Option<TriggerType>,
    pub status: Option<JobStatus>,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Aggregate batch statistics over a time window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total: i64,
    pub by_status: Vec<(String, i64)>,
    pub by_trigger: Vec<(String, i64)>,
    #[serde(with = "decimal_serde")]
    pub success_rate: Decimal,
}

// ============================================================================
// Database models (Diesel)
// ============================================================================

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::rebalancing_jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RebalancingJobDB {
    pub id: String,
    pub customer_id: String,
    pub account_number: String,
    pub job_type: String,
    pub trigger_type: String,
    pub status: String,
    pub current_snapshot: Option<String>,
    pub target_snapshot: Option<String>,
    pub order_plan: Option<String>,
    pub total_fee: String,
    pub failure_reason: Option<String>,
    pub cancel_reason: Option<String>,
    pub created_at: String,
    pub approved_at: Option<String>,
    pub executed_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,
}

fn datetime_or_now(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn datetime_opt(value: &Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl TryFrom<RebalancingJob> for RebalancingJobDB {
    type Error = Error;

    fn try_from(value: RebalancingJob) -> Result<Self> {
        Ok(RebalancingJobDB {
            id: value.id,
            customer_id: value.customer_id,
            account_number: value.account_number,
            job_type: value.job_type.as_str().to_string(),
            trigger_type: value.trigger_type.as_str().to_string(),
            status: value.status.as_str().to_string(),
            current_snapshot: value
                .current_snapshot
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            target_snapshot: value.target.as_ref().map(serde_json::to_string).transpose()?,
            order_plan: value.order_plan.as_ref().map(serde_json::to_string).transpose()?,
            total_fee: value.total_fee.round_dp(DECIMAL_PRECISION).to_string(),
            failure_reason: value.failure_reason,
            cancel_reason: value.cancel_reason,
            created_at: value.created_at.to_rfc3339(),
            approved_at: value.approved_at.map(|dt| dt.to_rfc3339()),
            executed_at: value.executed_at.map(|dt| dt.to_rfc3339()),
            completed_at: value.completed_at.map(|dt| dt.to_rfc3339()),
            cancelled_at: value.cancelled_at.map(|dt| dt.to_rfc3339()),
        })
    }
}

impl TryFrom<RebalancingJobDB> for RebalancingJob {
    type Error = Error;

    fn try_from(value: RebalancingJobDB) -> Result<Self> {
        Ok(RebalancingJob {
            job_type: JobType::parse(&value.job_type)?,
            trigger_type: TriggerType::parse(&value.trigger_type)?,
            status: JobStatus::parse(&value.status)?,
            current_snapshot: value
                .current_snapshot
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            target: value
                .target_snapshot
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            order_plan: value
                .order_plan
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            total_fee: Decimal::from_str(&value.total_fee).unwrap_or_default(),
            created_at: datetime_or_now(&value.created_at),
            approved_at: datetime_opt(&value.approved_at),
            executed_at: datetime_opt(&value.executed_at),
            completed_at: datetime_opt(&value.completed_at),
            cancelled_at: datetime_opt(&value.cancelled_at),
            id: value.id,
            customer_id: value.customer_id,
            account_number: value.account_number,
            failure_reason: value.failure_reason,
            cancel_reason: value.cancel_reason,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::rebalancing_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RebalancingOrderDB {
    pub id: String,
    pub job_id: String,
    pub order_type: String,
    pub asset_type: String,
    pub fund_code: String,
    pub fund_name: String,
    pub class_code: Option<String>,
    pub expected_nav: String,
    pub filled_nav: Option<String>,
    pub order_units: String,
    pub order_amount: String,
    pub filled_units: Option<String>,
    pub filled_amount: Option<String>,
    pub fee: String,
    pub fee_type: Option<String>,
    pub status: String,
    pub bank_order_id: Option<String>,
    pub execution_reason: Option<String>,
    pub filled_at: Option<String>,
    pub failed_at: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn decimal_opt(value: &Option<String>) -> Option<Decimal> {
    value.as_deref().and_then(|s| Decimal::from_str(s).ok())
}

impl From<RebalancingOrder> for RebalancingOrderDB {
    fn from(value: RebalancingOrder) -> Self {
        RebalancingOrderDB {
            id: value.id,
            job_id: value.job_id,
            order_type: value.order_type.as_str().to_string(),
            asset_type: value.asset_type.to_string(),
            fund_code: value.fund_code,
            fund_name: value.fund_name,
            class_code: value.class_code,
            expected_nav: value.expected_nav.to_string(),
            filled_nav: value.filled_nav.map(|d| d.to_string()),
            order_units: value.order_units.to_string(),
            order_amount: value.order_amount.round_dp(DECIMAL_PRECISION).to_string(),
            filled_units: value.filled_units.map(|d| d.to_string()),
            filled_amount: value
                .filled_amount
                .map(|d| d.round_dp(DECIMAL_PRECISION).to_string()),
            fee: value.fee.round_dp(DECIMAL_PRECISION).to_string(),
            fee_type: value.fee_type,
            status: value.status.as_str().to_string(),
            bank_order_id: value.bank_order_id,
            execution_reason: value.execution_reason,
            filled_at: value.filled_at.map(|dt| dt.to_rfc3339()),
            failed_at: value.failed_at.map(|dt| dt.to_rfc3339()),
            failure_reason: value.failure_reason,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<RebalancingOrderDB> for RebalancingOrder {
    type Error = Error;

    fn try_from(value: RebalancingOrderDB) -> Result<Self> {
        Ok(RebalancingOrder {
            order_type: OrderType::parse(&value.order_type)?,
            status: OrderStatus::parse(&value.status)?,
            asset_type: value.asset_type,
            expected_nav: Decimal::from_str(&value.expected_nav).unwrap_or_default(),
            filled_nav: decimal_opt(&value.filled_nav),
            order_units: Decimal::from_str(&value.order_units).unwrap_or_default(),
            order_amount: Decimal::from_str(&value.order_amount).unwrap_or_default(),
            filled_units: decimal_opt(&value.filled_units),
            filled_amount: decimal_opt(&value.filled_amount),
            fee: Decimal::from_str(&value.fee).unwrap_or_default(),
            filled_at: datetime_opt(&value.filled_at),
            failed_at: datetime_opt(&value.failed_at),
            created_at: datetime_or_now(&value.created_at),
            updated_at: datetime_or_now(&value.updated_at),
            id: value.id,
            job_id: value.job_id,
            fund_code: value.fund_code,
            fund_name: value.fund_name,
            class_code: value.class_code,
            fee_type: value.fee_type,
            bank_order_id: value.bank_order_id,
            execution_reason: value.execution_reason,
            failure_reason: value.failure_reason,
        })
    }
}
