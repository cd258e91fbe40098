use async_trait::async_trait;
use rust_decimal::Decimal;

use super::bank_errors::BankError;
use super::bank_models::{DepositHolding, FundHolding, FundOrder, FundOrderResult};

/// Uniform network interface to a partner bank's IRP systems.
///
/// Read operations may be retried; `submit_fund_order` must not be retried on
/// timeout, since the outcome is ambiguous until reconciled against the bank.
#[async_trait]
pub trait BankGateway: Send + Sync {
    async fn get_irp_account_balance(&self, account_number: &str)
        -> Result<Decimal, BankError>;

    async fn get_irp_deposit_holdings(
        &self,
        account_number: &str,
    ) -> Result<Vec<DepositHolding>, BankError>;

    async fn get_irp_fund_holdings(
        &self,
        account_number: &str,
    ) -> Result<Vec<FundHolding>, BankError>;

    async fn submit_fund_order(
        &self,
        account_number: &str,
        order: &FundOrder,
    ) -> Result<FundOrderResult, BankError>;
}
