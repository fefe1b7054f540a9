use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::postgres::{map_db_error, PgStore};
use crate::models::{Bill, BillAmounts, BillView, NewBill, PaymentStatus};
use crate::utils::errors::{AppError, AppResult};

/// Factura unida a su trabajo, solicitud, vehículo y cliente
const BILL_VIEW_SELECT: &str = r#"
    SELECT b.*,
           j.job_status, j.labor_charge, j.start_time, j.end_time,
           r.service_type, r.problem_note,
           v.plate_no, v.brand, v.model, v.year,
           c.name AS customer_name, c.phone AS customer_phone, c.email AS customer_email
    FROM billing b
    JOIN service_jobs j ON j.job_id = b.job_id
    JOIN service_requests r ON r.request_id = j.request_id
    JOIN vehicles v ON v.vehicle_id = r.vehicle_id
    JOIN customers c ON c.customer_id = v.customer_id
"#;

#[async_trait]
pub trait BillingRepository: Send + Sync {
    /// Las más recientes primero
    async fn list_bills(&self) -> AppResult<Vec<BillView>>;
    async fn find_bill(&self, bill_id: i32) -> AppResult<Option<Bill>>;
    async fn find_bill_by_job(&self, job_id: i32) -> AppResult<Option<Bill>>;
    async fn find_bill_view(&self, bill_id: i32) -> AppResult<Option<BillView>>;
    async fn find_bill_view_by_job(&self, job_id: i32) -> AppResult<Option<BillView>>;
    /// La unicidad de `job_id` es la garantía final: `AlreadyBilled`
    async fn insert_bill(&self, bill: &NewBill) -> AppResult<Bill>;
    async fn mark_bill_paid(
        &self,
        bill_id: i32,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<Bill>>;
    async fn update_bill_amounts(
        &self,
        bill_id: i32,
        amounts: &BillAmounts,
    ) -> AppResult<Option<Bill>>;
}

#[async_trait]
impl BillingRepository for PgStore {
    async fn list_bills(&self) -> AppResult<Vec<BillView>> {
        let sql = format!("{} ORDER BY b.bill_date DESC, b.bill_id DESC", BILL_VIEW_SELECT);
        sqlx::query_as::<_, BillView>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_bill(&self, bill_id: i32) -> AppResult<Option<Bill>> {
        sqlx::query_as::<_, Bill>("SELECT * FROM billing WHERE bill_id = $1")
            .bind(bill_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_bill_by_job(&self, job_id: i32) -> AppResult<Option<Bill>> {
        sqlx::query_as::<_, Bill>("SELECT * FROM billing WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_bill_view(&self, bill_id: i32) -> AppResult<Option<BillView>> {
        let sql = format!("{} WHERE b.bill_id = $1", BILL_VIEW_SELECT);
        sqlx::query_as::<_, BillView>(&sql)
            .bind(bill_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_bill_view_by_job(&self, job_id: i32) -> AppResult<Option<BillView>> {
        let sql = format!("{} WHERE b.job_id = $1", BILL_VIEW_SELECT);
        sqlx::query_as::<_, BillView>(&sql)
            .bind(job_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn insert_bill(&self, bill: &NewBill) -> AppResult<Bill> {
        log::debug!(
            "INSERT billing job_id={} total={}",
            bill.job_id,
            bill.amounts.total_amount
        );

        sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO billing (
                job_id, subtotal_labor, subtotal_parts, tax, total_amount,
                payment_status, bill_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(bill.job_id)
        .bind(bill.amounts.subtotal_labor)
        .bind(bill.amounts.subtotal_parts)
        .bind(bill.amounts.tax)
        .bind(bill.amounts.total_amount)
        .bind(PaymentStatus::Unpaid.as_str())
        .bind(bill.bill_date)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match map_db_error(e) {
            AppError::DuplicateKey(_) => AppError::AlreadyBilled { job_id: bill.job_id },
            other => other,
        })
    }

    async fn mark_bill_paid(
        &self,
        bill_id: i32,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<Bill>> {
        sqlx::query_as::<_, Bill>(
            r#"
            UPDATE billing SET payment_status = $2, payment_date = $3
            WHERE bill_id = $1
            RETURNING *
            "#,
        )
        .bind(bill_id)
        .bind(PaymentStatus::Paid.as_str())
        .bind(paid_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn update_bill_amounts(
        &self,
        bill_id: i32,
        amounts: &BillAmounts,
    ) -> AppResult<Option<Bill>> {
        log::debug!("UPDATE billing bill_id={} total={}", bill_id, amounts.total_amount);

        sqlx::query_as::<_, Bill>(
            r#"
            UPDATE billing SET
                subtotal_labor = $2, subtotal_parts = $3, tax = $4, total_amount = $5
            WHERE bill_id = $1
            RETURNING *
            "#,
        )
        .bind(bill_id)
        .bind(amounts.subtotal_labor)
        .bind(amounts.subtotal_parts)
        .bind(amounts.tax)
        .bind(amounts.total_amount)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }
}
