pub(crate) mod allocation_errors;
pub(crate) mod allocation_model;
pub(crate) mod allocation_service;
pub(crate) mod allocation_traits;

pub use allocation_errors::AllocationError;
pub use allocation_model::{AllocationDecision, AllocationStrategy, BlendWeights, TargetAllocation};
pub use allocation_service::{model_allocation, AllocationServiceImpl};
pub use allocation_traits::{AllocationService, PeerRecommendationProvider};
