use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

use super::rebalancing_model::{
    JobQuery, JobStatistics, Page, RebalancingJob, RebalancingOrder,
    RebalancingSimulationResponse, SimulationRequest,
};

#[async_trait]
pub trait RebalancingRepository: Send + Sync {
    async fn create_job(&self, job: RebalancingJob) -> Result<RebalancingJob>;
    async fn update_job(&self, job: RebalancingJob) -> Result<RebalancingJob>;
    async fn find_job(&self, job_id: &str) -> Result<Option<RebalancingJob>>;

    async fn create_orders(&self, orders: Vec<RebalancingOrder>) -> Result<Vec<RebalancingOrder>>;
    async fn update_order(&self, order: RebalancingOrder) -> Result<RebalancingOrder>;
    async fn orders_for_job(&self, job_id: &str) -> Result<Vec<RebalancingOrder>>;

    /// Most recent job creation time for the customer, for the cooldown gate.
    async fn latest_job_created_at(&self, customer_id: &str) -> Result<Option<DateTime<Utc>>>;

    async fn list_jobs(&self, query: JobQuery) -> Result<Page<RebalancingJob>>;

    async fn job_statistics(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<JobStatistics>;
}

#[async_trait]
pub trait RebalancingService: Send + Sync {
    /// Builds the current snapshot, resolves a target, plans orders and
    /// persists a SIMULATION job. Touches no external system.
    async fn simulate(&self, request: SimulationRequest) -> Result<RebalancingSimulationResponse>;

    /// Promotes an approvable simulation into an EXECUTION job and runs its
    /// orders against the bank gateway.
    async fn approve_and_execute(&self, job_id: &str) -> Result<RebalancingSimulationResponse>;

    /// Operator cancel before execution starts.
    async fn cancel(&self, job_id: &str, reason: &str) -> Result<RebalancingSimulationResponse>;

    async fn get_status(&self, job_id: &str) -> Result<RebalancingSimulationResponse>;

    async fn list_jobs(&self, query: JobQuery) -> Result<Page<RebalancingJob>>;

    async fn job_statistics(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<JobStatistics>;

    /// True when the customer had any job created within the cooldown window.
    async fn in_cooldown(&self, customer_id: &str, now: DateTime<Utc>) -> Result<bool>;
}
