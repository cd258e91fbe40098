use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    db::{get_connection, DbPool, WriteHandle},
    schema::irp_accounts,
    Result,
};

use super::accounts_errors::AccountError;
use super::accounts_model::{IrpAccount, IrpAccountDB, NewIrpAccount};
use super::accounts_traits::AccountRepository;

pub struct AccountRepositoryImpl {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepositoryImpl {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepository for AccountRepositoryImpl {
    async fn register(&self, account: NewIrpAccount) -> Result<IrpAccount> {
        account.validate()?;
        let db_account: IrpAccountDB = account.into();

        self.writer
            .exec(move |conn| {
                diesel::insert_into(irp_accounts::table)
                    .values(&db_account)
                    .execute(conn)?;

                let created = irp_accounts::table
                    .find(&db_account.id)
                    .first::<IrpAccountDB>(conn)?;

                created.try_into()
            })
            .await
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Option<IrpAccount>> {
        let mut conn = get_connection(&self.pool)?;

        let account = irp_accounts::table
            .filter(irp_accounts::customer_id.eq(customer_id))
            .filter(irp_accounts::is_active.eq(1))
            .first::<IrpAccountDB>(&mut conn)
            .optional()?;

        account.map(TryInto::try_into).transpose()
    }

    async fn find_by_account_number(&self, account_number: &str) -> Result<Option<IrpAccount>> {
        let mut conn = get_connection(&self.pool)?;

        let account = irp_accounts::table
            .filter(irp_accounts::account_number.eq(account_number))
            .first::<IrpAccountDB>(&mut conn)
            .optional()?;

        account.map(TryInto::try_into).transpose()
    }

    async fn list_auto_rebalance_accounts(&self) -> Result<Vec<IrpAccount>> {
        let mut conn = get_connection(&self.pool)?;

        let accounts = irp_accounts::table
            .filter(irp_accounts::auto_rebalance.eq(1))
            .filter(irp_accounts::is_active.eq(1))
            .order(irp_accounts::created_at.asc())
            .load::<IrpAccountDB>(&mut conn)?;

        accounts.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_auto_rebalance(&self, customer_id: &str, enabled: bool) -> Result<IrpAccount> {
        let customer_id = customer_id.to_string();

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(
                    irp_accounts::table.filter(irp_accounts::customer_id.eq(&customer_id)),
                )
                .set((
                    irp_accounts::auto_rebalance.eq(if enabled { 1 } else { 0 }),
                    irp_accounts::updated_at.eq(chrono::Utc::now().to_rfc3339()),
                ))
                .execute(conn)?;

                if updated == 0 {
                    return Err(AccountError::NotFound(format!(
                        "No IRP account for customer {}",
                        customer_id
                    ))
                    .into());
                }

                let account = irp_accounts::table
                    .filter(irp_accounts::customer_id.eq(&customer_id))
                    .first::<IrpAccountDB>(conn)?;

                account.try_into()
            })
            .await
    }

    async fn deactivate(&self, customer_id: &str) -> Result<()> {
        let customer_id = customer_id.to_string();

        self.writer
            .exec(move |conn| {
                diesel::update(
                    irp_accounts::table.filter(irp_accounts::customer_id.eq(&customer_id)),
                )
                .set((
                    irp_accounts::is_active.eq(0),
                    irp_accounts::updated_at.eq(chrono::Utc::now().to_rfc3339()),
                ))
                .execute(conn)?;
                Ok(())
            })
            .await
    }
}
