//! Diario de consumo de artículos
//!
//! Alta y baja de consumos comparten transacción con el movimiento de stock.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::inventory_repository::{credit_stock, debit_stock};
use super::postgres::{map_db_error, PgStore};
use crate::models::{PartUsage, PartUsageDetail};
use crate::utils::errors::{not_found_error, AppResult};

#[async_trait]
pub trait JobPartsRepository: Send + Sync {
    async fn list_usages_for_job(&self, job_id: i32) -> AppResult<Vec<PartUsageDetail>>;
    /// Descuenta stock, congela el precio actual e inserta el consumo
    async fn record_usage(&self, job_id: i32, part_id: i32, quantity: i32)
        -> AppResult<PartUsage>;
    /// Borra el consumo y devuelve al stock la cantidad original
    async fn remove_usage(&self, usage_id: i32) -> AppResult<PartUsage>;
    async fn total_parts_cost(&self, job_id: i32) -> AppResult<Decimal>;
}

#[async_trait]
impl JobPartsRepository for PgStore {
    async fn list_usages_for_job(&self, job_id: i32) -> AppResult<Vec<PartUsageDetail>> {
        sqlx::query_as::<_, PartUsageDetail>(
            r#"
            SELECT u.usage_id, u.job_id, u.part_id, u.quantity_used,
                   u.unit_price_at_time, u.used_at,
                   p.part_name, p.part_code, p.brand
            FROM job_parts_used u
            JOIN inventory p ON p.part_id = u.part_id
            WHERE u.job_id = $1
            ORDER BY u.used_at, u.usage_id
            "#,
        )
        .bind(job_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn record_usage(
        &self,
        job_id: i32,
        part_id: i32,
        quantity: i32,
    ) -> AppResult<PartUsage> {
        log::debug!(
            "BEGIN usage job_id={} part_id={} qty={}",
            job_id,
            part_id,
            quantity
        );
        let mut tx = self.pool().begin().await.map_err(map_db_error)?;

        let job_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM service_jobs WHERE job_id = $1)")
                .bind(job_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;
        if !job_exists {
            return Err(not_found_error("Service job", job_id));
        }

        let part = debit_stock(&mut tx, part_id, quantity).await?;

        let usage = sqlx::query_as::<_, PartUsage>(
            r#"
            INSERT INTO job_parts_used (job_id, part_id, quantity_used, unit_price_at_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(part_id)
        .bind(quantity)
        .bind(part.unit_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(usage)
    }

    async fn remove_usage(&self, usage_id: i32) -> AppResult<PartUsage> {
        log::debug!("BEGIN remove usage_id={}", usage_id);
        let mut tx = self.pool().begin().await.map_err(map_db_error)?;

        let usage = sqlx::query_as::<_, PartUsage>(
            "DELETE FROM job_parts_used WHERE usage_id = $1 RETURNING *",
        )
        .bind(usage_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| not_found_error("Part usage", usage_id))?;

        credit_stock(&mut tx, usage.part_id, usage.quantity_used).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(usage)
    }

    async fn total_parts_cost(&self, job_id: i32) -> AppResult<Decimal> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(quantity_used * unit_price_at_time), 0)
            FROM job_parts_used
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }
}
