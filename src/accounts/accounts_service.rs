use async_trait::async_trait;
use std::sync::Arc;

use crate::Result;

use super::accounts_errors::AccountError;
use super::accounts_model::{IrpAccount, NewIrpAccount};
use super::accounts_traits::{AccountRepository, AccountService};

pub struct AccountServiceImpl {
    repository: Arc<dyn AccountRepository>,
}

impl AccountServiceImpl {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, account: NewIrpAccount) -> Result<IrpAccount> {
        self.repository.register(account).await
    }

    async fn get_by_customer(&self, customer_id: &str) -> Result<IrpAccount> {
        self.repository
            .find_by_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AccountError::NotFound(format!("No active IRP account for customer {}", customer_id))
                    .into()
            })
    }

    async fn list_auto_rebalance_accounts(&self) -> Result<Vec<IrpAccount>> {
        self.repository.list_auto_rebalance_accounts().await
    }

    async fn set_auto_rebalance(&self, customer_id: &str, enabled: bool) -> Result<IrpAccount> {
        self.repository.set_auto_rebalance(customer_id, enabled).await
    }

    async fn deactivate(&self, customer_id: &str) -> Result<()> {
        self.repository.deactivate(customer_id).await
    }
}
