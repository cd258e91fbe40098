pub(crate) mod accounts_errors;
pub(crate) mod accounts_model;
pub(crate) mod accounts_repository;
pub(crate) mod accounts_service;
pub(crate) mod accounts_traits;

pub use accounts_model::{IrpAccount, IrpAccountDB, NewIrpAccount, RiskProfile};
pub use accounts_repository::AccountRepositoryImpl;
pub use accounts_service::AccountServiceImpl;
pub use accounts_traits::{AccountRepository, AccountService};

pub use accounts_errors::AccountError;
