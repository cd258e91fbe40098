use async_trait::async_trait;

use crate::Result;

use super::accounts_model::{IrpAccount, NewIrpAccount};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn register(&self, account: NewIrpAccount) -> Result<IrpAccount>;
    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<IrpAccount>>;
    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<IrpAccount>>;
    async fn list_auto_rebalance_accounts(&self) -> Result<Vec<IrpAccount>>;
    async fn set_auto_rebalance(&self, customer_id: &str, enabled: bool) -> Result<IrpAccount>;
    async fn deactivate(&self, customer_id: &str) -> Result<()>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register(&self, account: NewIrpAccount) -> Result<IrpAccount>;
    async fn get_by_customer(&self, customer_id: &str) -> Result<IrpAccount>;
    async fn list_auto_rebalance_accounts(&self) -> Result<Vec<IrpAccount>>;
    async fn set_auto_rebalance(&self, customer_id: &str, enabled: bool) -> Result<IrpAccount>;
    async fn deactivate(&self, customer_id: &str) -> Result<()>;
}
