use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::accounts::{AccountError, AccountRepository, IrpAccount};
use crate::allocation::{AllocationService, AllocationStrategy};
use crate::banks::{BankGateway, FillStatus, FundOrder, GatewayRegistry};
use crate::constants::REBALANCE_COOLDOWN_DAYS;
use crate::holdings::HoldingsService;
use crate::portfolio::build_snapshot;
use crate::Result;

use super::planner::RebalancingPlanner;
use super::rebalancing_errors::RebalancingError;
use super::rebalancing_model::{
    JobQuery, JobStatistics, OrderStatus, OrderType, Page, RebalancingJob, RebalancingOrder,
    RebalancingSimulationResponse, SimulationRequest,
};
use super::rebalancing_traits::{RebalancingRepository, RebalancingService};

/// Orchestrator for the rebalancing job lifecycle. Serializes work per
/// customer: overlapping simulate/execute calls for the same customer would
/// double-count drift or double-submit orders.
pub struct RebalancingServiceImpl {
    repository: Arc<dyn RebalancingRepository>,
    holdings: Arc<dyn HoldingsService>,
    accounts: Arc<dyn AccountRepository>,
    allocation: Arc<dyn AllocationService>,
    gateways: Arc<GatewayRegistry>,
    planner: Arc<RebalancingPlanner>,
    customer_locks: DashMap<String, Arc<Mutex<()>>>,
    cooldown: Duration,
}

impl RebalancingServiceImpl {
    pub fn new(
        repository: Arc<dyn RebalancingRepository>,
        holdings: Arc<dyn HoldingsService>,
        accounts: Arc<dyn AccountRepository>,
        allocation: Arc<dyn AllocationService>,
        gateways: Arc<GatewayRegistry>,
        planner: Arc<RebalancingPlanner>,
    ) -> Self {
        Self {
            repository,
            holdings,
            accounts,
            allocation,
            gateways,
            planner,
            customer_locks: DashMap::new(),
            cooldown: Duration::days(REBALANCE_COOLDOWN_DAYS),
        }
    }

    pub fn planner(&self) -> &RebalancingPlanner {
        &self.planner
    }

    fn customer_lock(&self, customer_id: &str) -> Arc<Mutex<()>> {
        self.customer_locks
            .entry(customer_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn account_for(&self, customer_id: &str) -> Result<IrpAccount> {
        self.accounts
            .find_by_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AccountError::NotFound(format!("No active IRP account for customer {}", customer_id))
                    .into()
            })
    }

    async fn response_for(&self, job: &RebalancingJob) -> Result<RebalancingSimulationResponse> {
        let orders = self.repository.orders_for_job(&job.id).await?;
        Ok(RebalancingSimulationResponse::from_job(job, orders))
    }

    /// Submits one order and applies its outcome to the order and holdings.
    /// Gateway errors land on the order, never escape the loop.
    async fn execute_order(
        &self,
        job: &RebalancingJob,
        account: &IrpAccount,
        gateway: &Arc<dyn BankGateway>,
        mut order: RebalancingOrder,
    ) -> Result<RebalancingOrder> {
        let fund_order = match order.order_type {
            OrderType::Buy => FundOrder::buy(order.fund_code.clone(), order.order_amount),
            OrderType::Sell => FundOrder::sell(order.fund_code.clone(), order.order_units),
        };

        match gateway
            .submit_fund_order(&job.account_number, &fund_order)
            .await
        {
            Ok(result) => {
                order.submit(&result.bank_order_id)?;
                match result.status {
                    FillStatus::Filled => {
                        order.fill(result.filled_nav, result.filled_units, result.filled_amount)?
                    }
                    FillStatus::PartialFilled => order.partial_fill(
                        result.filled_nav,
                        result.filled_units,
                        result.filled_amount,
                    )?,
                    FillStatus::Rejected => order.fail("Rejected by bank"),
                }

                if order.status.is_terminal_success() {
                    let fill_units = order.filled_units.unwrap_or(Decimal::ZERO);
                    let applied = match order.order_type {
                        OrderType::Buy => {
                            self.holdings
                                .record_buy_fill(
                                    &job.customer_id,
                                    &account.id,
                                    &order.fund_code,
                                    &order.fund_name,
                                    fill_units,
                                    order.filled_amount.unwrap_or(Decimal::ZERO),
                                    order.filled_nav.unwrap_or(order.expected_nav),
                                )
                                .await
                        }
                        OrderType::Sell => {
                            self.holdings
                                .record_sell_fill(
                                    &job.customer_id,
                                    &order.fund_code,
                                    fill_units,
                                    order.filled_nav.unwrap_or(order.expected_nav),
                                )
                                .await
                        }
                    };
                    if let Err(e) = applied {
                        // The trade happened; the holding catches up on the
                        // next valuation refresh.
                        error!(
                            "fill for order {} executed but holding update failed: {}",
                            order.id, e
                        );
                    }
                }
            }
            Err(e) => {
                warn!("order {} submission failed: {}", order.id, e);
                order.fail(&e.to_string());
            }
        }

        self.repository.update_order(order).await
    }
}

#[async_trait]
impl RebalancingService for RebalancingServiceImpl {
    async fn simulate(&self, request: SimulationRequest) -> Result<RebalancingSimulationResponse> {
        let lock = self.customer_lock(&request.customer_id);
        let _guard = lock.lock().await;

        let account = self.account_for(&request.customer_id).await?;

        let refresh = self
            .holdings
            .refresh_all(&request.customer_id, request.require_fresh)
            .await?;
        if !refresh.is_fully_fresh() {
            warn!(
                "simulating for customer {} on partially stale data: {:?}",
                request.customer_id, refresh.stale
            );
        }

        let holdings = self
            .holdings
            .list_open_holdings(&request.customer_id)
            .await?;
        let snapshot = build_snapshot(&holdings, Utc::now());

        let decision = match request.explicit_target {
            Some(target) => self.allocation.resolve_manual(target)?,
            None => {
                let strategy = request.strategy.unwrap_or(AllocationStrategy::Model);
                self.allocation
                    .resolve(&request.customer_id, account.risk_profile, strategy)
                    .await?
            }
        };

        let mut job = RebalancingJob::new_simulation(
            &request.customer_id,
            &account.account_number,
            request.trigger_type,
            snapshot.clone(),
            decision.clone(),
            serde_json::Value::Null,
            Decimal::ZERO,
        );

        let plan = self.planner.plan(
            &job.id,
            request.trigger_type,
            &holdings,
            &snapshot,
            &decision.target,
            None,
        )?;

        job.order_plan = Some(serde_json::to_value(&plan.orders)?);
        job.total_fee = plan.total_fee;

        let job = self.repository.create_job(job).await?;
        let orders = self.repository.create_orders(plan.orders).await?;

        info!(
            "created simulation job {} for customer {} with {} orders",
            job.id,
            job.customer_id,
            orders.len()
        );

        Ok(RebalancingSimulationResponse::from_job(&job, orders))
    }

    async fn approve_and_execute(&self, job_id: &str) -> Result<RebalancingSimulationResponse> {
        let found = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or_else(|| RebalancingError::JobNotFound(job_id.to_string()))?;

        let lock = self.customer_lock(&found.customer_id);
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent call may have advanced it.
        let mut job = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or_else(|| RebalancingError::JobNotFound(job_id.to_string()))?;

        if job.can_be_approved() {
            job.approve()?;
            job = self.repository.update_job(job).await?;
        }

        // Rejects EXECUTING and terminal jobs: re-invocation never
        // re-submits orders.
        job.start_execution()?;
        let job = self.repository.update_job(job).await?;

        let account = self.account_for(&job.customer_id).await?;
        let gateway = self
            .gateways
            .for_bank(&account.bank_code)
            .map_err(crate::Error::Bank)?;

        // SELL before BUY, as planned.
        let mut orders = self.repository.orders_for_job(&job.id).await?;
        orders.sort_by_key(|o| match o.order_type {
            OrderType::Sell => 0,
            OrderType::Buy => 1,
        });

        let mut executed = Vec::with_capacity(orders.len());
        for order in orders {
            if order.status != OrderStatus::Pending {
                executed.push(order);
                continue;
            }
            let updated = self.execute_order(&job, &account, &gateway, order).await?;
            executed.push(updated);
        }

        let failed: Vec<&RebalancingOrder> = executed
            .iter()
            .filter(|o| !o.status.is_terminal_success())
            .collect();

        let mut job = job;
        if failed.is_empty() {
            job.complete()?;
        } else {
            let summary = failed
                .iter()
                .map(|o| {
                    format!(
                        "{} {} ({})",
                        o.order_type.as_str(),
                        o.fund_code,
                        o.failure_reason.as_deref().unwrap_or("no reason")
                    )
                })
                .collect::<Vec<_>>()
                .join("; ");
            job.fail(&format!("{} order(s) failed: {}", failed.len(), summary))?;
        }
        let job = self.repository.update_job(job).await?;

        info!(
            "job {} finished with status {}",
            job.id,
            job.status.as_str()
        );

        Ok(RebalancingSimulationResponse::from_job(&job, executed))
    }

    async fn cancel(&self, job_id: &str, reason: &str) -> Result<RebalancingSimulationResponse> {
        let found = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or_else(|| RebalancingError::JobNotFound(job_id.to_string()))?;

        let lock = self.customer_lock(&found.customer_id);
        let _guard = lock.lock().await;

        let mut job = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or_else(|| RebalancingError::JobNotFound(job_id.to_string()))?;

        job.cancel(reason)?;
        let job = self.repository.update_job(job).await?;

        let mut orders = self.repository.orders_for_job(&job.id).await?;
        for order in orders.iter_mut() {
            if order.status == OrderStatus::Pending {
                order.status = OrderStatus::Cancelled;
                order.updated_at = Utc::now();
                *order = self.repository.update_order(order.clone()).await?;
            }
        }

        Ok(RebalancingSimulationResponse::from_job(&job, orders))
    }

    async fn get_status(&self, job_id: &str) -> Result<RebalancingSimulationResponse> {
        let job = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or_else(|| RebalancingError::JobNotFound(job_id.to_string()))?;

        self.response_for(&job).await
    }

    async fn list_jobs(&self, query: JobQuery) -> Result<Page<RebalancingJob>> {
        self.repository.list_jobs(query).await
    }

    async fn job_statistics(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<JobStatistics> {
        self.repository.job_statistics(window_start, window_end).await
    }

    async fn in_cooldown(&self, customer_id: &str, now: DateTime<Utc>) -> Result<bool> {
        match self.repository.latest_job_created_at(customer_id).await? {
            Some(created_at) => Ok(now - created_at < self.cooldown),
            None => Ok(false),
        }
    }
}
