use async_trait::async_trait;

use super::postgres::{map_db_error, PgStore};
use crate::models::{DashboardStats, JobStatus, PaymentStatus, RequestStatus};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn dashboard_stats(&self) -> AppResult<DashboardStats>;
}

#[async_trait]
impl DashboardRepository for PgStore {
    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        log::debug!("SELECT dashboard stats");

        sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM customers) AS customers_count,
                (SELECT COUNT(*) FROM vehicles) AS vehicles_count,
                (SELECT COUNT(*) FROM service_requests WHERE status = $1) AS pending_requests,
                (SELECT COUNT(*) FROM service_jobs WHERE job_status = $2) AS active_jobs,
                (SELECT COUNT(*) FROM inventory
                 WHERE quantity_in_stock <= reorder_level) AS low_stock_items,
                (SELECT COALESCE(SUM(total_amount), 0) FROM billing
                 WHERE payment_status = $3) AS unpaid_total,
                (SELECT COALESCE(SUM(total_amount), 0) FROM billing
                 WHERE payment_status = $4) AS total_revenue
            "#,
        )
        .bind(RequestStatus::Pending.as_str())
        .bind(JobStatus::InProgress.as_str())
        .bind(PaymentStatus::Unpaid.as_str())
        .bind(PaymentStatus::Paid.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }
}
