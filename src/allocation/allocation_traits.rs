use async_trait::async_trait;

use crate::accounts::RiskProfile;
use crate::Result;

use super::allocation_errors::AllocationError;
use super::allocation_model::{AllocationDecision, AllocationStrategy, TargetAllocation};

/// External peer-similarity recommendation collaborator.
#[async_trait]
pub trait PeerRecommendationProvider: Send + Sync {
    async fn peer_allocation(
        &self,
        customer_id: &str,
        risk_profile: RiskProfile,
    ) -> std::result::Result<TargetAllocation, AllocationError>;
}

#[async_trait]
pub trait AllocationService: Send + Sync {
    /// Produces a target vector for the customer under the given strategy.
    async fn resolve(
        &self,
        customer_id: &str,
        risk_profile: RiskProfile,
        strategy: AllocationStrategy,
    ) -> Result<AllocationDecision>;

    /// Validates and wraps an explicit caller-supplied target vector.
    fn resolve_manual(&self, target: TargetAllocation) -> Result<AllocationDecision>;
}
