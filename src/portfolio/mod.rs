pub(crate) mod snapshot_model;
pub(crate) mod snapshot_service;

pub use snapshot_model::{HoldingDetail, PortfolioSnapshot, SleeveAllocation};
pub use snapshot_service::build_snapshot;
