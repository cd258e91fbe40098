use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    db::{get_connection, DbPool, WriteHandle},
    schema::holdings,
    Result,
};

use super::holdings_errors::HoldingError;
use super::holdings_model::{Holding, HoldingDB};
use super::holdings_traits::HoldingRepository;

const OPEN_STATUSES: [&str; 2] = ["ACTIVE", "PARTIAL_SOLD"];

pub struct HoldingRepositoryImpl {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepositoryImpl {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl HoldingRepository for HoldingRepositoryImpl {
    async fn upsert(&self, holding: Holding) -> Result<Holding> {
        self.writer
            .exec(move |conn| {
                // Read-then-write on the single writer connection keeps the
                // one-open-row-per-key guarantee under concurrent refresh and
                // fill updates.
                let mut query = holdings::table
                    .filter(holdings::customer_id.eq(&holding.customer_id))
                    .filter(holdings::sleeve.eq(holding.sleeve.as_str()))
                    .filter(holdings::status.eq_any(OPEN_STATUSES))
                    .into_boxed();

                query = match &holding.instrument_code {
                    Some(code) => query.filter(holdings::instrument_code.eq(code.clone())),
                    None => query.filter(holdings::instrument_code.is_null()),
                };

                let existing = query.first::<HoldingDB>(conn).optional()?;

                let db_holding = match existing {
                    Some(found) => {
                        let mut db_holding: HoldingDB = holding.into();
                        db_holding.id = found.id.clone();
                        db_holding.created_at = found.created_at.clone();
                        diesel::update(holdings::table.find(&found.id))
                            .set(&db_holding)
                            .execute(conn)?;
                        db_holding
                    }
                    None => {
                        let db_holding: HoldingDB = holding.into();
                        diesel::insert_into(holdings::table)
                            .values(&db_holding)
                            .execute(conn)?;
                        db_holding
                    }
                };

                let stored = holdings::table
                    .find(&db_holding.id)
                    .first::<HoldingDB>(conn)?;

                stored.try_into()
            })
            .await
    }

    async fn save(&self, holding: Holding) -> Result<Holding> {
        self.writer
            .exec(move |conn| {
                let db_holding: HoldingDB = holding.into();
                let updated = diesel::update(holdings::table.find(&db_holding.id))
                    .set(&db_holding)
                    .execute(conn)?;

                if updated == 0 {
                    return Err(
                        HoldingError::NotFound(format!("Holding {}", db_holding.id)).into()
                    );
                }

                let stored = holdings::table
                    .find(&db_holding.id)
                    .first::<HoldingDB>(conn)?;

                stored.try_into()
            })
            .await
    }

    async fn list_open(&self, customer_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings::table
            .filter(holdings::customer_id.eq(customer_id))
            .filter(holdings::status.eq_any(OPEN_STATUSES))
            .order(holdings::created_at.asc())
            .load::<HoldingDB>(&mut conn)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_open(
        &self,
        customer_id: &str,
        sleeve: super::holdings_model::SleeveType,
        instrument_code: Option<&str>,
    ) -> Result<Option<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = holdings::table
            .filter(holdings::customer_id.eq(customer_id))
            .filter(holdings::sleeve.eq(sleeve.as_str()))
            .filter(holdings::status.eq_any(OPEN_STATUSES))
            .into_boxed();

        query = match instrument_code {
            Some(code) => query.filter(holdings::instrument_code.eq(code.to_string())),
            None => query.filter(holdings::instrument_code.is_null()),
        };

        let row = query.first::<HoldingDB>(&mut conn).optional()?;
        row.map(TryInto::try_into).transpose()
    }
}
