use async_trait::async_trait;

use super::postgres::{map_db_error, PgStore};
use crate::models::{
    JobStatus, NewServiceRequest, RequestChanges, RequestFilter, RequestStatus, ServiceJob,
    ServiceRequest, ServiceRequestSummary,
};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Inserta la solicitud y su trabajo en una sola unidad atómica
    async fn create_request_with_job(
        &self,
        request: &NewServiceRequest,
    ) -> AppResult<(ServiceRequest, ServiceJob)>;
    async fn find_request(&self, request_id: i32) -> AppResult<Option<ServiceRequest>>;
    async fn find_request_summary(
        &self,
        request_id: i32,
    ) -> AppResult<Option<ServiceRequestSummary>>;
    /// Filtros combinados con AND; más recientes primero
    async fn list_requests(&self, filter: &RequestFilter) -> AppResult<Vec<ServiceRequestSummary>>;
    async fn update_request(
        &self,
        request_id: i32,
        changes: &RequestChanges,
    ) -> AppResult<Option<ServiceRequest>>;
    async fn set_request_status(
        &self,
        request_id: i32,
        status: RequestStatus,
    ) -> AppResult<Option<ServiceRequest>>;
    /// `HasDependentJobs` si algún trabajo la referencia; `false` si no existe
    async fn delete_request(&self, request_id: i32) -> AppResult<bool>;
}

const SUMMARY_SELECT: &str = r#"
    SELECT r.request_id, r.vehicle_id, r.service_type, r.problem_note, r.priority,
           r.status, r.request_date,
           v.plate_no, c.customer_id, c.name AS customer_name,
           j.job_id, j.employee_id AS assigned_employee_id
    FROM service_requests r
    LEFT JOIN vehicles v ON v.vehicle_id = r.vehicle_id
    LEFT JOIN customers c ON c.customer_id = v.customer_id
    LEFT JOIN LATERAL (
        SELECT job_id, employee_id
        FROM service_jobs
        WHERE request_id = r.request_id
        ORDER BY job_id DESC
        LIMIT 1
    ) j ON TRUE
"#;

#[async_trait]
impl ServiceRequestRepository for PgStore {
    async fn create_request_with_job(
        &self,
        request: &NewServiceRequest,
    ) -> AppResult<(ServiceRequest, ServiceJob)> {
        log::debug!("BEGIN request+job vehicle_id={}", request.vehicle_id);
        let mut tx = self.pool().begin().await.map_err(map_db_error)?;

        let created = sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO service_requests (vehicle_id, service_type, problem_note, priority, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.vehicle_id)
        .bind(&request.service_type)
        .bind(&request.problem_note)
        .bind(&request.priority)
        .bind(request.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let job = sqlx::query_as::<_, ServiceJob>(
            r#"
            INSERT INTO service_jobs (request_id, employee_id, job_status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(created.request_id)
        .bind(request.assigned_employee_id)
        .bind(JobStatus::InProgress.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok((created, job))
    }

    async fn find_request(&self, request_id: i32) -> AppResult<Option<ServiceRequest>> {
        sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE request_id = $1")
            .bind(request_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_request_summary(
        &self,
        request_id: i32,
    ) -> AppResult<Option<ServiceRequestSummary>> {
        let sql = format!("{} WHERE r.request_id = $1", SUMMARY_SELECT);
        sqlx::query_as::<_, ServiceRequestSummary>(&sql)
            .bind(request_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn list_requests(&self, filter: &RequestFilter) -> AppResult<Vec<ServiceRequestSummary>> {
        let sql = format!(
            r#"{}
            WHERE ($1::text IS NULL OR r.status = $1)
              AND ($2::text IS NULL
                   OR c.name ILIKE $2 ESCAPE '\'
                   OR v.plate_no ILIKE $2 ESCAPE '\'
                   OR r.service_type ILIKE $2 ESCAPE '\')
              AND ($3::int IS NULL OR c.customer_id = $3)
              AND ($4::int IS NULL OR r.vehicle_id = $4)
            ORDER BY r.request_date DESC, r.request_id DESC
            "#,
            SUMMARY_SELECT
        );
        let pattern = filter.search.as_deref().map(contains_pattern);

        sqlx::query_as::<_, ServiceRequestSummary>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(pattern)
            .bind(filter.customer_id)
            .bind(filter.vehicle_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn update_request(
        &self,
        request_id: i32,
        changes: &RequestChanges,
    ) -> AppResult<Option<ServiceRequest>> {
        log::debug!("UPDATE service_request request_id={}", request_id);

        sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests SET
                service_type = COALESCE($2, service_type),
                problem_note = COALESCE($3, problem_note),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                vehicle_id = COALESCE($6, vehicle_id)
            WHERE request_id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(&changes.service_type)
        .bind(&changes.problem_note)
        .bind(&changes.priority)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.vehicle_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn set_request_status(
        &self,
        request_id: i32,
        status: RequestStatus,
    ) -> AppResult<Option<ServiceRequest>> {
        log::debug!("UPDATE service_request request_id={} status={}", request_id, status);

        sqlx::query_as::<_, ServiceRequest>(
            "UPDATE service_requests SET status = $2 WHERE request_id = $1 RETURNING *",
        )
        .bind(request_id)
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn delete_request(&self, request_id: i32) -> AppResult<bool> {
        let mut tx = self.pool().begin().await.map_err(map_db_error)?;

        let locked: Option<i32> = sqlx::query_scalar(
            "SELECT request_id FROM service_requests WHERE request_id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if locked.is_none() {
            return Ok(false);
        }

        let has_jobs: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM service_jobs WHERE request_id = $1)")
                .bind(request_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;
        if has_jobs {
            return Err(AppError::HasDependentJobs { request_id });
        }

        sqlx::query("DELETE FROM service_requests WHERE request_id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }
}

/// Patrón ILIKE de subcadena literal: `%`, `_` y `\` del término no son comodines
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("corolla"), "%corolla%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern("AB_1"), r"%AB\_1%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
