pub(crate) mod bank_errors;
pub(crate) mod bank_models;
pub(crate) mod bank_traits;
pub(crate) mod gateway_registry;
pub(crate) mod rest_gateway;

pub use bank_errors::BankError;
pub use bank_models::{
    DepositHolding, FillStatus, FundHolding, FundOrder, FundOrderResult, OrderSide,
};
pub use bank_traits::BankGateway;
pub use gateway_registry::GatewayRegistry;
pub use rest_gateway::RestBankGateway;
