use chrono::Utc;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::accounts::{AccountService, IrpAccount};
use crate::allocation::{AllocationService, AllocationStrategy};
use crate::holdings::HoldingsService;
use crate::portfolio::build_snapshot;
use crate::rebalancing::{
    RebalancingPlanner, RebalancingService, SimulationRequest, TriggerType,
};
use crate::Result;

use super::scheduler_model::{BatchOutcome, TriggerDefinition};

/// Drives the cron-style trigger surface. Each registered trigger runs on a
/// tokio interval; each tick enumerates enrolled accounts and processes
/// customers independently.
pub struct SchedulerService {
    accounts: Arc<dyn AccountService>,
    holdings: Arc<dyn HoldingsService>,
    allocation: Arc<dyn AllocationService>,
    rebalancing: Arc<dyn RebalancingService>,
    planner: Arc<RebalancingPlanner>,
}

impl SchedulerService {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        holdings: Arc<dyn HoldingsService>,
        allocation: Arc<dyn AllocationService>,
        rebalancing: Arc<dyn RebalancingService>,
        planner: Arc<RebalancingPlanner>,
    ) -> Self {
        Self {
            accounts,
            holdings,
            allocation,
            rebalancing,
            planner,
        }
    }

    /// Spawns one interval loop per trigger definition. Abort the returned
    /// handles to stop the scheduler.
    pub fn start(self: Arc<Self>, definitions: Vec<TriggerDefinition>) -> Vec<JoinHandle<()>> {
        definitions
            .into_iter()
            .map(|definition| {
                let scheduler = Arc::clone(&self);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(definition.interval);
                    // The first tick of a tokio interval fires immediately;
                    // consume it so the trigger waits a full period.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        let outcome = match definition.trigger_type {
                            TriggerType::Periodic => scheduler.run_periodic_once().await,
                            TriggerType::Threshold => scheduler.run_threshold_once().await,
                            _ => scheduler.run_test_once().await,
                        };
                        info!(
                            "{} tick: processed={} skipped={} failed={}",
                            definition.name,
                            outcome.processed,
                            outcome.skipped,
                            outcome.failed
                        );
                    }
                })
            })
            .collect()
    }

    /// Time-based batch: unconditionally simulate for every enrolled
    /// customer; execute only when the plan is non-empty.
    pub async fn run_periodic_once(&self) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let accounts = match self.accounts.list_auto_rebalance_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!("periodic batch could not enumerate accounts: {}", e);
                return outcome;
            }
        };

        for account in accounts {
            match self.periodic_for(&account).await {
                Ok(true) => outcome.processed += 1,
                Ok(false) => outcome.skipped += 1,
                Err(e) => {
                    error!(
                        "periodic rebalance failed for customer {}: {}",
                        account.customer_id, e
                    );
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    /// Band-based batch: honor the cooldown, then act only on customers whose
    /// drift exceeds a sleeve threshold.
    pub async fn run_threshold_once(&self) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let accounts = match self.accounts.list_auto_rebalance_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!("threshold batch could not enumerate accounts: {}", e);
                return outcome;
            }
        };

        for account in accounts {
            match self.threshold_for(&account).await {
                Ok(true) => outcome.processed += 1,
                Ok(false) => outcome.skipped += 1,
                Err(e) => {
                    error!(
                        "threshold rebalance failed for customer {}: {}",
                        account.customer_id, e
                    );
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    /// Simulation-only batch for smoke checks.
    pub async fn run_test_once(&self) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        let accounts = match self.accounts.list_auto_rebalance_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!("test batch could not enumerate accounts: {}", e);
                return outcome;
            }
        };

        for account in accounts {
            let request = SimulationRequest {
                customer_id: account.customer_id.clone(),
                trigger_type: TriggerType::Test,
                strategy: None,
                explicit_target: None,
                require_fresh: false,
            };
            match self.rebalancing.simulate(request).await {
                Ok(_) => outcome.processed += 1,
                Err(e) => {
                    error!(
                        "test simulation failed for customer {}: {}",
                        account.customer_id, e
                    );
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    async fn periodic_for(&self, account: &IrpAccount) -> Result<bool> {
        let request = SimulationRequest {
            customer_id: account.customer_id.clone(),
            trigger_type: TriggerType::Periodic,
            strategy: None,
            explicit_target: None,
            require_fresh: false,
        };
        let simulation = self.rebalancing.simulate(request).await?;

        if simulation.orders.is_empty() {
            debug!(
                "periodic simulation for customer {} produced no orders",
                account.customer_id
            );
            return Ok(false);
        }

        self.rebalancing
            .approve_and_execute(&simulation.job_id)
            .await?;
        Ok(true)
    }

    async fn threshold_for(&self, account: &IrpAccount) -> Result<bool> {
        if self
            .rebalancing
            .in_cooldown(&account.customer_id, Utc::now())
            .await?
        {
            debug!(
                "customer {} is in the rebalancing cooldown, skipping",
                account.customer_id
            );
            return Ok(false);
        }

        self.holdings
            .refresh_all(&account.customer_id, false)
            .await?;
        let holdings = self
            .holdings
            .list_open_holdings(&account.customer_id)
            .await?;
        let snapshot = build_snapshot(&holdings, Utc::now());

        let decision = self
            .allocation
            .resolve(
                &account.customer_id,
                account.risk_profile,
                AllocationStrategy::Model,
            )
            .await?;

        let breaches = self.planner.band_breaches(&snapshot, &decision.target);
        if breaches.is_empty() {
            return Ok(false);
        }
        debug!(
            "customer {} drift breaches: {:?}",
            account.customer_id, breaches
        );

        let request = SimulationRequest {
            customer_id: account.customer_id.clone(),
            trigger_type: TriggerType::Threshold,
            strategy: None,
            explicit_target: None,
            require_fresh: false,
        };
        let simulation = self.rebalancing.simulate(request).await?;

        if simulation.orders.is_empty() {
            return Ok(false);
        }

        self.rebalancing
            .approve_and_execute(&simulation.job_id)
            .await?;
        Ok(true)
    }
}
