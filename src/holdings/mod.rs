pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_service;
pub(crate) mod holdings_traits;

pub use holdings_errors::HoldingError;
pub use holdings_model::{Holding, HoldingDB, HoldingStatus, RefreshReport, SleeveType};
pub use holdings_repository::HoldingRepositoryImpl;
pub use holdings_service::HoldingsServiceImpl;
pub use holdings_traits::{HoldingRepository, HoldingsService};

#[cfg(test)]
pub(crate) mod tests;
