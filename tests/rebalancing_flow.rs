// End-to-end orchestration tests over in-memory collaborators. The bank
// gateway, holdings store and job store are all mocked behind their traits;
// the orchestrator, planner, allocation resolver and scheduler are real.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use irp_core::accounts::{
    AccountRepository, AccountServiceImpl, IrpAccount, NewIrpAccount, RiskProfile,
};
use irp_core::allocation::{
    AllocationError, AllocationServiceImpl, PeerRecommendationProvider, TargetAllocation,
};
use irp_core::banks::{
    BankError, BankGateway, DepositHolding, FillStatus, FundHolding, FundOrder, FundOrderResult,
    GatewayRegistry, OrderSide,
};
use irp_core::holdings::{Holding, HoldingsService, RefreshReport, SleeveType};
use irp_core::rebalancing::{
    JobQuery, JobStatistics, JobStatus, JobType, OrderStatus, Page, RebalancingJob,
    RebalancingOrder, RebalancingPlanner, RebalancingRepository, RebalancingService,
    RebalancingServiceImpl, SimulationRequest, TriggerType,
};
use irp_core::scheduler::SchedulerService;
use irp_core::Result;

// ----------------------------------------------------------------------------
// In-memory collaborators
// ----------------------------------------------------------------------------

#[derive(Default)]
struct MemoryJobStore {
    jobs: Mutex<HashMap<String, RebalancingJob>>,
    orders: Mutex<Vec<RebalancingOrder>>,
}

#[async_trait]
impl RebalancingRepository for MemoryJobStore {
    async fn create_job(&self, job: RebalancingJob) -> Result<RebalancingJob> {
        self.jobs.lock().await.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn update_job(&self, job: RebalancingJob) -> Result<RebalancingJob> {
        self.jobs.lock().await.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn find_job(&self, job_id: &str) -> Result<Option<RebalancingJob>> {
        Ok(self.jobs.lock().await.get(job_id).cloned())
    }

    async fn create_orders(&self, orders: Vec<RebalancingOrder>) -> Result<Vec<RebalancingOrder>> {
        self.orders.lock().await.extend(orders.clone());
        Ok(orders)
    }

    async fn update_order(&self, order: RebalancingOrder) -> Result<RebalancingOrder> {
        let mut orders = self.orders.lock().await;
        if let Some(slot) = orders.iter_mut().find(|o| o.id == order.id) {
            *slot = order.clone();
        }
        Ok(order)
    }

    async fn orders_for_job(&self, job_id: &str) -> Result<Vec<RebalancingOrder>> {
        Ok(self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn latest_job_created_at(&self, customer_id: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .jobs
            .lock()
            .await
            .values()
            .filter(|j| j.customer_id == customer_id)
            .map(|j| j.created_at)
            .max())
    }

    async fn list_jobs(&self, query: JobQuery) -> Result<Page<RebalancingJob>> {
        let jobs = self.jobs.lock().await;
        let items: Vec<RebalancingJob> = jobs
            .values()
            .filter(|j| query.status.map_or(true, |s| j.status == s))
            .filter(|j| query.trigger_type.map_or(true, |t| j.trigger_type == t))
            .cloned()
            .collect();
        let total = items.len() as i64;
        Ok(Page {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn job_statistics(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<JobStatistics> {
        Ok(JobStatistics {
            window_start,
            window_end,
            total: self.jobs.lock().await.len() as i64,
            by_status: vec![],
            by_trigger: vec![],
            success_rate: Decimal::ZERO,
        })
    }
}

struct MemoryHoldings {
    holdings: Mutex<Vec<Holding>>,
}

impl MemoryHoldings {
    fn new(initial: Vec<Holding>) -> Self {
        Self {
            holdings: Mutex::new(initial),
        }
    }
}

#[async_trait]
impl HoldingsService for MemoryHoldings {
    async fn refresh_cash_balance(&self, _customer_id: &str) -> Result<()> {
        Ok(())
    }

    async fn refresh_deposit_holdings(&self, _customer_id: &str) -> Result<()> {
        Ok(())
    }

    async fn refresh_fund_holdings(&self, _customer_id: &str) -> Result<()> {
        Ok(())
    }

    async fn refresh_all(&self, _customer_id: &str, _require_fresh: bool) -> Result<RefreshReport> {
        Ok(RefreshReport::default())
    }

    async fn list_open_holdings(&self, customer_id: &str) -> Result<Vec<Holding>> {
        Ok(self
            .holdings
            .lock()
            .await
            .iter()
            .filter(|h| h.customer_id == customer_id && h.status.is_open())
            .cloned()
            .collect())
    }

    async fn record_buy_fill(
        &self,
        customer_id: &str,
        account_id: &str,
        fund_code: &str,
        fund_name: &str,
        units: Decimal,
        amount: Decimal,
        nav: Decimal,
    ) -> Result<Holding> {
        let mut holdings = self.holdings.lock().await;
        if let Some(holding) = holdings.iter_mut().find(|h| {
            h.customer_id == customer_id
                && h.sleeve == SleeveType::Fund
                && h.instrument_code.as_deref() == Some(fund_code)
                && h.status.is_open()
        }) {
            holding.apply_buy_fill(units, amount, nav)?;
            return Ok(holding.clone());
        }
        let holding = Holding::new_fund(customer_id, account_id, fund_code, fund_name, units, nav, nav);
        holdings.push(holding.clone());
        Ok(holding)
    }

    async fn record_sell_fill(
        &self,
        customer_id: &str,
        fund_code: &str,
        units: Decimal,
        nav: Decimal,
    ) -> Result<Holding> {
        let mut holdings = self.holdings.lock().await;
        let holding = holdings
            .iter_mut()
            .find(|h| {
                h.customer_id == customer_id
                    && h.sleeve == SleeveType::Fund
                    && h.instrument_code.as_deref() == Some(fund_code)
                    && h.status.is_open()
            })
            .expect("fund holding for sell fill");
        holding.apply_sell_fill(units, nav)?;
        Ok(holding.clone())
    }
}

struct MemoryAccounts {
    accounts: Mutex<Vec<IrpAccount>>,
}

impl MemoryAccounts {
    fn single(customer_id: &str, risk_profile: RiskProfile) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            accounts: Mutex::new(vec![IrpAccount {
                id: "ACC1".to_string(),
                customer_id: customer_id.to_string(),
                account_number: "110-123-456789".to_string(),
                bank_code: "TESTBANK".to_string(),
                risk_profile,
                auto_rebalance: true,
                is_active: true,
                created_at: now.clone(),
                updated_at: now,
            }]),
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn register(&self, account: NewIrpAccount) -> Result<IrpAccount> {
        let now = Utc::now().to_rfc3339();
        let account = IrpAccount {
            id: account.id.unwrap_or_else(|| "ACC-NEW".to_string()),
            customer_id: account.customer_id,
            account_number: account.account_number,
            bank_code: account.bank_code,
            risk_profile: account.risk_profile,
            auto_rebalance: account.auto_rebalance,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        self.accounts.lock().await.push(account.clone());
        Ok(account)
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<IrpAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|a| a.customer_id == customer_id && a.is_active)
            .cloned())
    }

    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<IrpAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn list_auto_rebalance_accounts(&self) -> Result<Vec<IrpAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|a| a.auto_rebalance && a.is_active)
            .cloned()
            .collect())
    }

    async fn set_auto_rebalance(&self, customer_id: &str, enabled: bool) -> Result<IrpAccount> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.customer_id == customer_id)
            .expect("account");
        account.auto_rebalance = enabled;
        Ok(account.clone())
    }

    async fn deactivate(&self, customer_id: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().await;
        if let Some(account) = accounts.iter_mut().find(|a| a.customer_id == customer_id) {
            account.is_active = false;
        }
        Ok(())
    }
}

struct NoPeer;

#[async_trait]
impl PeerRecommendationProvider for NoPeer {
    async fn peer_allocation(
        &self,
        _customer_id: &str,
        _risk_profile: RiskProfile,
    ) -> std::result::Result<TargetAllocation, AllocationError> {
        Err(AllocationError::PeerUnavailable("not wired".to_string()))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum GatewayMode {
    Fill,
    Reject,
    PartialFill,
}

struct MockBankGateway {
    mode: GatewayMode,
    nav: Decimal,
    submissions: Mutex<Vec<FundOrder>>,
}

impl MockBankGateway {
    fn new(mode: GatewayMode) -> Self {
        Self {
            mode,
            nav: dec!(1000),
            submissions: Mutex::new(Vec::new()),
        }
    }

    async fn submission_count(&self) -> usize {
        self.submissions.lock().await.len()
    }
}

#[async_trait]
impl BankGateway for MockBankGateway {
    async fn get_irp_account_balance(
        &self,
        _account_number: &str,
    ) -> std::result::Result<Decimal, BankError> {
        Ok(dec!(0))
    }

    async fn get_irp_deposit_holdings(
        &self,
        _account_number: &str,
    ) -> std::result::Result<Vec<DepositHolding>, BankError> {
        Ok(vec![])
    }

    async fn get_irp_fund_holdings(
        &self,
        _account_number: &str,
    ) -> std::result::Result<Vec<FundHolding>, BankError> {
        Ok(vec![])
    }

    async fn submit_fund_order(
        &self,
        _account_number: &str,
        order: &FundOrder,
    ) -> std::result::Result<FundOrderResult, BankError> {
        self.submissions.lock().await.push(order.clone());

        match self.mode {
            GatewayMode::Reject => Err(BankError::Rejected("insufficient balance".to_string())),
            GatewayMode::Fill => {
                let (units, amount) = match order.side {
                    OrderSide::Buy => {
                        let amount = order.amount.expect("buy amount");
                        (amount / self.nav, amount)
                    }
                    OrderSide::Sell => {
                        let units = order.units.expect("sell units");
                        (units, units * self.nav)
                    }
                };
                Ok(FundOrderResult {
                    bank_order_id: format!("BNK-{}", order.fund_code),
                    filled_nav: self.nav,
                    filled_units: units,
                    filled_amount: amount,
                    status: FillStatus::Filled,
                })
            }
            GatewayMode::PartialFill => {
                let (units, amount) = match order.side {
                    OrderSide::Buy => {
                        let amount = order.amount.expect("buy amount") / dec!(2);
                        (amount / self.nav, amount)
                    }
                    OrderSide::Sell => {
                        let units = order.units.expect("sell units") / dec!(2);
                        (units, units * self.nav)
                    }
                };
                Ok(FundOrderResult {
                    bank_order_id: format!("BNK-{}", order.fund_code),
                    filled_nav: self.nav,
                    filled_units: units,
                    filled_amount: amount,
                    status: FillStatus::PartialFilled,
                })
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Fixture wiring
// ----------------------------------------------------------------------------

struct Fixture {
    service: Arc<RebalancingServiceImpl>,
    holdings: Arc<MemoryHoldings>,
    jobs: Arc<MemoryJobStore>,
    accounts: Arc<MemoryAccounts>,
    gateway: Arc<MockBankGateway>,
    planner: Arc<RebalancingPlanner>,
}

fn sample_holdings() -> Vec<Holding> {
    vec![
        Holding::new_cash("CUST1", "ACC1", dec!(2000000)),
        Holding::new_deposit(
            "CUST1",
            "ACC1",
            "DEP001",
            "1Y Time Deposit",
            dec!(3000000),
            dec!(3.2),
            chrono::NaiveDate::from_ymd_opt(2027, 5, 2).unwrap(),
        ),
        Holding::new_fund(
            "CUST1",
            "ACC1",
            "FND001",
            "Global Equity",
            dec!(5000),
            dec!(1000),
            dec!(1000),
        ),
    ]
}

fn fixture(mode: GatewayMode, initial_holdings: Vec<Holding>) -> Fixture {
    fixture_for(mode, initial_holdings, RiskProfile::Growth)
}

fn fixture_for(
    mode: GatewayMode,
    initial_holdings: Vec<Holding>,
    risk_profile: RiskProfile,
) -> Fixture {
    let jobs = Arc::new(MemoryJobStore::default());
    let holdings = Arc::new(MemoryHoldings::new(initial_holdings));
    let accounts = Arc::new(MemoryAccounts::single("CUST1", risk_profile));
    let gateway = Arc::new(MockBankGateway::new(mode));

    let mut registry = GatewayRegistry::new();
    registry.register("TESTBANK", gateway.clone());

    let allocation = Arc::new(AllocationServiceImpl::new(Arc::new(NoPeer)));
    let planner = Arc::new(RebalancingPlanner::with_defaults());

    let service = Arc::new(RebalancingServiceImpl::new(
        jobs.clone(),
        holdings.clone(),
        accounts.clone(),
        allocation,
        Arc::new(registry),
        planner.clone(),
    ));

    Fixture {
        service,
        holdings,
        jobs,
        accounts,
        gateway,
        planner,
    }
}

fn manual_request(target: TargetAllocation) -> SimulationRequest {
    SimulationRequest {
        customer_id: "CUST1".to_string(),
        trigger_type: TriggerType::Manual,
        strategy: None,
        explicit_target: Some(target),
        require_fresh: false,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[tokio::test]
async fn end_to_end_buy_flow_completes() {
    let fx = fixture(GatewayMode::Fill, sample_holdings());

    // 20/30/50 -> 10/30/60 over 10M: single 1M BUY, no sells
    let simulation = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();

    assert_eq!(simulation.job_type, JobType::Simulation);
    assert_eq!(simulation.status, JobStatus::Pending);
    assert_eq!(simulation.orders.len(), 1);
    assert_eq!(simulation.orders[0].order_amount, dec!(1000000));
    assert_eq!(simulation.orders[0].order_units, dec!(1000));
    assert_eq!(fx.gateway.submission_count().await, 0);

    let executed = fx
        .service
        .approve_and_execute(&simulation.job_id)
        .await
        .unwrap();

    assert_eq!(executed.job_type, JobType::Execution);
    assert_eq!(executed.status, JobStatus::Completed);
    assert_eq!(executed.orders.len(), 1);
    assert_eq!(executed.orders[0].status, OrderStatus::Filled);
    assert_eq!(executed.orders[0].filled_units, Some(dec!(1000)));
    assert_eq!(fx.gateway.submission_count().await, 1);

    // Fill landed on the holding store: 5,000 + 1,000 units
    let holdings = fx.holdings.list_open_holdings("CUST1").await.unwrap();
    let fund = holdings
        .iter()
        .find(|h| h.instrument_code.as_deref() == Some("FND001"))
        .unwrap();
    assert_eq!(fund.units, Some(dec!(6000)));
}

#[tokio::test]
async fn re_execution_is_rejected_without_resubmission() {
    let fx = fixture(GatewayMode::Fill, sample_holdings());

    let simulation = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();

    fx.service
        .approve_and_execute(&simulation.job_id)
        .await
        .unwrap();
    assert_eq!(fx.gateway.submission_count().await, 1);

    // Second invocation conflicts and submits nothing.
    let err = fx.service.approve_and_execute(&simulation.job_id).await;
    assert!(err.is_err());
    assert_eq!(fx.gateway.submission_count().await, 1);
}

#[tokio::test]
async fn rejected_order_fails_job_with_reasons() {
    let fx = fixture(GatewayMode::Reject, sample_holdings());

    let simulation = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();

    let executed = fx
        .service
        .approve_and_execute(&simulation.job_id)
        .await
        .unwrap();

    assert_eq!(executed.status, JobStatus::Failed);
    assert_eq!(executed.orders[0].status, OrderStatus::Failed);
    assert!(executed.orders[0]
        .failure_reason
        .as_deref()
        .unwrap()
        .contains("insufficient balance"));
    assert!(executed
        .current_snapshot
        .is_some());

    let status = fx.service.get_status(&simulation.job_id).await.unwrap();
    assert_eq!(status.status, JobStatus::Failed);
}

#[tokio::test]
async fn partial_fill_is_a_terminal_success() {
    let fx = fixture(GatewayMode::PartialFill, sample_holdings());

    let simulation = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();

    let executed = fx
        .service
        .approve_and_execute(&simulation.job_id)
        .await
        .unwrap();

    assert_eq!(executed.status, JobStatus::Completed);
    assert_eq!(executed.orders[0].status, OrderStatus::PartialFilled);
    let rate = executed.orders[0].fill_rate();
    assert!(rate > Decimal::ZERO && rate < Decimal::ONE);
}

#[tokio::test]
async fn cancelled_job_cannot_be_executed() {
    let fx = fixture(GatewayMode::Fill, sample_holdings());

    let simulation = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();

    let cancelled = fx
        .service
        .cancel(&simulation.job_id, "operator request")
        .await
        .unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert!(cancelled
        .orders
        .iter()
        .all(|o| o.status == OrderStatus::Cancelled));

    assert!(fx
        .service
        .approve_and_execute(&simulation.job_id)
        .await
        .is_err());
    assert_eq!(fx.gateway.submission_count().await, 0);
}

#[tokio::test]
async fn invalid_manual_target_creates_no_job() {
    let fx = fixture(GatewayMode::Fill, sample_holdings());

    let result = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(70),
        )))
        .await;

    assert!(result.is_err());
    assert_eq!(fx.jobs.jobs.lock().await.len(), 0);
}

#[tokio::test]
async fn threshold_scheduler_honors_cooldown() {
    // Growth profile targets 10/30/60; holdings sit at 20/30/50 (10pp fund
    // drift, past the 5pp band).
    let fx = fixture(GatewayMode::Fill, sample_holdings());

    let accounts_service = Arc::new(AccountServiceImpl::new(fx.accounts.clone()));
    let allocation = Arc::new(AllocationServiceImpl::new(Arc::new(NoPeer)));
    let scheduler = SchedulerService::new(
        accounts_service,
        fx.holdings.clone(),
        allocation,
        fx.service.clone(),
        fx.planner.clone(),
    );

    // A job from 2 days ago puts the customer inside the 7-day cooldown.
    let recent = fx
        .service
        .simulate(manual_request(TargetAllocation::new(
            dec!(10),
            dec!(30),
            dec!(60),
        )))
        .await
        .unwrap();
    {
        let mut jobs = fx.jobs.jobs.lock().await;
        let job = jobs.get_mut(&recent.job_id).unwrap();
        job.created_at = Utc::now() - Duration::days(2);
    }

    let outcome = scheduler.run_threshold_once().await;
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.processed, 0);
    assert_eq!(fx.jobs.jobs.lock().await.len(), 1);

    // Age the job past the cooldown; the same drift now triggers.
    {
        let mut jobs = fx.jobs.jobs.lock().await;
        let job = jobs.get_mut(&recent.job_id).unwrap();
        job.created_at = Utc::now() - Duration::days(8);
    }

    let outcome = scheduler.run_threshold_once().await;
    assert_eq!(outcome.processed, 1);
    assert!(fx.jobs.jobs.lock().await.len() > 1);
    assert!(fx.gateway.submission_count().await >= 1);
}

#[tokio::test]
async fn periodic_scheduler_skips_empty_plans() {
    // Holdings already exactly on the Growth target 10/30/60
    let aligned = vec![
        Holding::new_cash("CUST1", "ACC1", dec!(1000000)),
        Holding::new_deposit(
            "CUST1",
            "ACC1",
            "DEP001",
            "1Y Time Deposit",
            dec!(3000000),
            dec!(3.2),
            chrono::NaiveDate::from_ymd_opt(2027, 5, 2).unwrap(),
        ),
        Holding::new_fund(
            "CUST1",
            "ACC1",
            "FND001",
            "Global Equity",
            dec!(6000),
            dec!(1000),
            dec!(1000),
        ),
    ];
    let fx = fixture(GatewayMode::Fill, aligned);

    let accounts_service = Arc::new(AccountServiceImpl::new(fx.accounts.clone()));
    let allocation = Arc::new(AllocationServiceImpl::new(Arc::new(NoPeer)));
    let scheduler = SchedulerService::new(
        accounts_service,
        fx.holdings.clone(),
        allocation,
        fx.service.clone(),
        fx.planner.clone(),
    );

    let outcome = scheduler.run_periodic_once().await;

    // Simulation ran but produced no orders, so nothing executed.
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(fx.gateway.submission_count().await, 0);

    let jobs = fx.jobs.jobs.lock().await;
    assert_eq!(jobs.len(), 1);
    let job = jobs.values().next().unwrap();
    assert_eq!(job.trigger_type, TriggerType::Periodic);
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn model_strategy_uses_account_risk_profile() {
    // Stable profile targets 20/60/20; holdings at 20/30/50 produce sells.
    let fx = fixture_for(GatewayMode::Fill, sample_holdings(), RiskProfile::Stable);

    let simulation = fx
        .service
        .simulate(SimulationRequest {
            customer_id: "CUST1".to_string(),
            trigger_type: TriggerType::Manual,
            strategy: None,
            explicit_target: None,
            require_fresh: false,
        })
        .await
        .unwrap();

    let target = simulation.target.as_ref().unwrap();
    assert_eq!(target.target, TargetAllocation::new(dec!(20), dec!(60), dec!(20)));
    assert!(simulation
        .orders
        .iter()
        .all(|o| o.order_type == irp_core::rebalancing::OrderType::Sell));
}
