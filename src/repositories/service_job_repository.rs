use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::postgres::{map_db_error, PgStore};
use crate::models::{JobFilter, JobStatus, ServiceJob};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ServiceJobRepository: Send + Sync {
    /// Nuevo trabajo `In Progress` con `start_time` actual
    async fn create_job(
        &self,
        request_id: i32,
        employee_id: Option<i32>,
        labor_charge: Decimal,
    ) -> AppResult<ServiceJob>;
    async fn find_job(&self, job_id: i32) -> AppResult<Option<ServiceJob>>;
    async fn list_jobs(&self, filter: JobFilter) -> AppResult<Vec<ServiceJob>>;
    /// El trabajo de mayor `job_id` de la solicitud
    async fn latest_job_for_request(&self, request_id: i32) -> AppResult<Option<ServiceJob>>;
    /// El trabajo `In Progress` iniciado más recientemente para el vehículo
    async fn active_job_for_vehicle(&self, vehicle_id: i32) -> AppResult<Option<ServiceJob>>;
    async fn assign_job_employee(
        &self,
        job_id: i32,
        employee_id: i32,
    ) -> AppResult<Option<ServiceJob>>;
    async fn set_labor_charge(
        &self,
        job_id: i32,
        labor_charge: Decimal,
    ) -> AppResult<Option<ServiceJob>>;
    async fn set_job_status(
        &self,
        job_id: i32,
        status: JobStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<ServiceJob>>;
}

#[async_trait]
impl ServiceJobRepository for PgStore {
    async fn create_job(
        &self,
        request_id: i32,
        employee_id: Option<i32>,
        labor_charge: Decimal,
    ) -> AppResult<ServiceJob> {
        log::debug!("INSERT service_job request_id={}", request_id);

        sqlx::query_as::<_, ServiceJob>(
            r#"
            INSERT INTO service_jobs (request_id, employee_id, job_status, labor_charge)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(employee_id)
        .bind(JobStatus::InProgress.as_str())
        .bind(labor_charge)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn find_job(&self, job_id: i32) -> AppResult<Option<ServiceJob>> {
        sqlx::query_as::<_, ServiceJob>("SELECT * FROM service_jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn list_jobs(&self, filter: JobFilter) -> AppResult<Vec<ServiceJob>> {
        if filter.completed_without_bill {
            return sqlx::query_as::<_, ServiceJob>(
                r#"
                SELECT j.*
                FROM service_jobs j
                LEFT JOIN billing b ON b.job_id = j.job_id
                WHERE j.job_status = $1 AND b.bill_id IS NULL
                ORDER BY j.end_time DESC, j.job_id DESC
                "#,
            )
            .bind(JobStatus::Completed.as_str())
            .fetch_all(self.pool())
            .await
            .map_err(map_db_error);
        }

        sqlx::query_as::<_, ServiceJob>(
            r#"
            SELECT * FROM service_jobs
            WHERE ($1::text IS NULL OR job_status = $1)
            ORDER BY start_time DESC, job_id DESC
            "#,
        )
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn latest_job_for_request(&self, request_id: i32) -> AppResult<Option<ServiceJob>> {
        sqlx::query_as::<_, ServiceJob>(
            "SELECT * FROM service_jobs WHERE request_id = $1 ORDER BY job_id DESC LIMIT 1",
        )
        .bind(request_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn active_job_for_vehicle(&self, vehicle_id: i32) -> AppResult<Option<ServiceJob>> {
        sqlx::query_as::<_, ServiceJob>(
            r#"
            SELECT j.*
            FROM service_jobs j
            JOIN service_requests r ON r.request_id = j.request_id
            WHERE r.vehicle_id = $1 AND j.job_status = $2
            ORDER BY j.start_time DESC, j.job_id DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(JobStatus::InProgress.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn assign_job_employee(
        &self,
        job_id: i32,
        employee_id: i32,
    ) -> AppResult<Option<ServiceJob>> {
        sqlx::query_as::<_, ServiceJob>(
            "UPDATE service_jobs SET employee_id = $2 WHERE job_id = $1 RETURNING *",
        )
        .bind(job_id)
        .bind(employee_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn set_labor_charge(
        &self,
        job_id: i32,
        labor_charge: Decimal,
    ) -> AppResult<Option<ServiceJob>> {
        log::debug!("UPDATE service_job job_id={} labor={}", job_id, labor_charge);

        sqlx::query_as::<_, ServiceJob>(
            "UPDATE service_jobs SET labor_charge = $2 WHERE job_id = $1 RETURNING *",
        )
        .bind(job_id)
        .bind(labor_charge)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn set_job_status(
        &self,
        job_id: i32,
        status: JobStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<ServiceJob>> {
        log::debug!("UPDATE service_job job_id={} status={}", job_id, status);

        sqlx::query_as::<_, ServiceJob>(
            r#"
            UPDATE service_jobs SET job_status = $2, end_time = $3
            WHERE job_id = $1
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(status.as_str())
        .bind(end_time)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }
}
