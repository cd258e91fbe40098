use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

use crate::constants::WEIGHT_PRECISION;
use crate::{
    db::{get_connection, DbPool, WriteHandle},
    schema::{rebalancing_jobs, rebalancing_orders},
    Result,
};

use super::rebalancing_errors::RebalancingError;
use super::rebalancing_model::{
    JobQuery, JobStatistics, Page, RebalancingJob, RebalancingJobDB, RebalancingOrder,
    RebalancingOrderDB,
};
use super::rebalancing_traits::RebalancingRepository;

pub struct RebalancingRepositoryImpl {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RebalancingRepositoryImpl {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RebalancingRepository for RebalancingRepositoryImpl {
    async fn create_job(&self, job: RebalancingJob) -> Result<RebalancingJob> {
        let db_job: RebalancingJobDB = job.try_into()?;

        self.writer
            .exec(move |conn| {
                diesel::insert_into(rebalancing_jobs::table)
                    .values(&db_job)
                    .execute(conn)?;

                let created = rebalancing_jobs::table
                    .find(&db_job.id)
                    .first::<RebalancingJobDB>(conn)?;

                created.try_into()
            })
            .await
    }

    async fn update_job(&self, job: RebalancingJob) -> Result<RebalancingJob> {
        let db_job: RebalancingJobDB = job.try_into()?;

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(rebalancing_jobs::table.find(&db_job.id))
                    .set(&db_job)
                    .execute(conn)?;

                if updated == 0 {
                    return Err(RebalancingError::JobNotFound(db_job.id.clone()).into());
                }

                let stored = rebalancing_jobs::table
                    .find(&db_job.id)
                    .first::<RebalancingJobDB>(conn)?;

                stored.try_into()
            })
            .await
    }

    async fn find_job(&self, job_id: &str) -> Result<Option<RebalancingJob>> {
        let mut conn = get_connection(&self.pool)?;

        let job = rebalancing_jobs::table
            .find(job_id)
            .first::<RebalancingJobDB>(&mut conn)
            .optional()?;

        job.map(TryInto::try_into).transpose()
    }

    async fn create_orders(&self, orders: Vec<RebalancingOrder>) -> Result<Vec<RebalancingOrder>> {
        let db_orders: Vec<RebalancingOrderDB> =
            orders.into_iter().map(Into::into).collect();

        self.writer
            .exec(move |conn| {
                diesel::insert_into(rebalancing_orders::table)
                    .values(&db_orders)
                    .execute(conn)?;

                db_orders
                    .into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<_>>>()
            })
            .await
    }

    async fn update_order(&self, order: RebalancingOrder) -> Result<RebalancingOrder> {
        let db_order: RebalancingOrderDB = order.into();

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(rebalancing_orders::table.find(&db_order.id))
                    .set(&db_order)
                    .execute(conn)?;

                if updated == 0 {
                    return Err(RebalancingError::InvalidOrderState(format!(
                        "Order {} not found",
                        db_order.id
                    ))
                    .into());
                }

                let stored = rebalancing_orders::table
                    .find(&db_order.id)
                    .first::<RebalancingOrderDB>(conn)?;

                stored.try_into()
            })
            .await
    }

    async fn orders_for_job(&self, job_id: &str) -> Result<Vec<RebalancingOrder>> {
        let mut conn = get_connection(&self.pool)?;

        let orders = rebalancing_orders::table
            .filter(rebalancing_orders::job_id.eq(job_id))
            .order(rebalancing_orders::created_at.asc())
            .load::<RebalancingOrderDB>(&mut conn)?;

        orders.into_iter().map(TryInto::try_into).collect()
    }

    async fn latest_job_created_at(&self, customer_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut conn = get_connection(&self.pool)?;

        let latest: Option<String> = rebalancing_jobs::table
            .filter(rebalancing_jobs::customer_id.eq(customer_id))
            .select(diesel::dsl::max(rebalancing_jobs::created_at))
            .first(&mut conn)?;

        Ok(latest
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    async fn list_jobs(&self, query: JobQuery) -> Result<Page<RebalancingJob>> {
        let mut conn = get_connection(&self.pool)?;

        let page = query.page.max(0);
        let page_size = if query.page_size > 0 { query.page_size } else { 20 };

        let mut count_query = rebalancing_jobs::table.into_boxed();
        let mut rows_query = rebalancing_jobs::table.into_boxed();

        if let Some(trigger) = query.trigger_type {
            count_query =
                count_query.filter(rebalancing_jobs::trigger_type.eq(trigger.as_str()));
            rows_query = rows_query.filter(rebalancing_jobs::trigger_type.eq(trigger.as_str()));
        }
        if let Some(status) = query.status {
            count_query = count_query.filter(rebalancing_jobs::status.eq(status.as_str()));
            rows_query = rows_query.filter(rebalancing_jobs::status.eq(status.as_str()));
        }

        let total: i64 = count_query.count().get_result(&mut conn)?;

        let rows = rows_query
            .order(rebalancing_jobs::created_at.desc())
            .limit(page_size)
            .offset(page * page_size)
            .load::<RebalancingJobDB>(&mut conn)?;

        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    async fn job_statistics(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<JobStatistics> {
        let mut conn = get_connection(&self.pool)?;

        // Timestamps are RFC 3339 strings; lexical order matches time order
        // for a fixed UTC offset.
        let rows: Vec<(String, String)> = rebalancing_jobs::table
            .filter(rebalancing_jobs::created_at.ge(window_start.to_rfc3339()))
            .filter(rebalancing_jobs::created_at.lt(window_end.to_rfc3339()))
            .select((rebalancing_jobs::status, rebalancing_jobs::trigger_type))
            .load(&mut conn)?;

        let total = rows.len() as i64;
        let mut by_status: Vec<(String, i64)> = Vec::new();
        let mut by_trigger: Vec<(String, i64)> = Vec::new();
        let mut completed = 0i64;
        let mut terminal = 0i64;

        for (status, trigger) in &rows {
            bump(&mut by_status, status);
            bump(&mut by_trigger, trigger);
            match status.as_str() {
                "COMPLETED" => {
                    completed += 1;
                    terminal += 1;
                }
                "FAILED" | "CANCELLED" => terminal += 1,
                _ => {}
            }
        }

        let success_rate = if terminal > 0 {
            (Decimal::from(completed) / Decimal::from(terminal) * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(WEIGHT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };

        Ok(JobStatistics {
            window_start,
            window_end,
            total,
            by_status,
            by_trigger,
            success_rate,
        })
    }
}

fn bump(counts: &mut Vec<(String, i64)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += 1,
        None => counts.push((key.to_string(), 1)),
    }
}
