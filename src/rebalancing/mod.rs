pub(crate) mod planner;
pub(crate) mod rebalancing_errors;
pub(crate) mod rebalancing_model;
pub(crate) mod rebalancing_repository;
pub(crate) mod rebalancing_service;
pub(crate) mod rebalancing_traits;

pub use planner::{
    BandThresholds, BasisPointFeePolicy, FeePolicy, FundSelection, PlannerConfig, RebalancingPlan,
    RebalancingPlanner,
};
pub use rebalancing_errors::RebalancingError;
pub use rebalancing_model::{
    JobQuery, JobStatistics, JobStatus, JobType, OrderStatus, OrderType, Page, RebalancingJob,
    RebalancingJobDB, RebalancingOrder, RebalancingOrderDB, RebalancingSimulationResponse,
    SimulationRequest, TriggerType,
};
pub use rebalancing_repository::RebalancingRepositoryImpl;
pub use rebalancing_service::RebalancingServiceImpl;
pub use rebalancing_traits::{RebalancingRepository, RebalancingService};

#[cfg(test)]
pub(crate) mod tests;
