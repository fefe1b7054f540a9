//! Ciclo de vida de los trabajos
//!
//! `In Progress → Completed`; el estado completado es terminal. Completar de
//! nuevo sobrescribe `end_time`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::dto::service_job_dto::{CreateJobRequest, JobListQuery};
use crate::models::{JobFilter, JobStatus, ServiceJob};
use crate::repositories::{
    EmployeeRepository, ServiceJobRepository, ServiceRequestRepository, Store,
};
use crate::utils::errors::{invalid_argument, not_found_error, AppResult};
use crate::utils::validation::validate_amount;

pub struct ServiceJobController {
    store: Arc<dyn Store>,
}

impl ServiceJobController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateJobRequest) -> AppResult<ServiceJob> {
        let labor_charge = request.labor_charge.unwrap_or(Decimal::ZERO);
        validate_amount("labor_charge", labor_charge)?;

        if self.store.find_request(request.request_id).await?.is_none() {
            return Err(not_found_error("Service request", request.request_id));
        }
        if let Some(employee_id) = request.employee_id {
            self.ensure_employee(employee_id).await?;
        }

        let job = self
            .store
            .create_job(request.request_id, request.employee_id, labor_charge)
            .await?;
        tracing::info!(job_id = job.job_id, request_id = job.request_id, "🛠️ Job created");
        Ok(job)
    }

    pub async fn get(&self, job_id: i32) -> AppResult<ServiceJob> {
        self.store
            .find_job(job_id)
            .await?
            .ok_or_else(|| not_found_error("Service job", job_id))
    }

    pub async fn list(&self, query: JobListQuery) -> AppResult<Vec<ServiceJob>> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<JobStatus>)
            .transpose()?;

        self.store
            .list_jobs(JobFilter {
                status,
                completed_without_bill: query.completed_without_bill,
            })
            .await
    }

    pub async fn assign_employee(&self, job_id: i32, employee_id: i32) -> AppResult<ServiceJob> {
        self.ensure_employee(employee_id).await?;
        let job = self
            .store
            .assign_job_employee(job_id, employee_id)
            .await?
            .ok_or_else(|| not_found_error("Service job", job_id))?;
        tracing::info!(job_id, employee_id, "👷 Employee assigned");
        Ok(job)
    }

    /// Reabrir un trabajo completado no está permitido
    pub async fn update_status(&self, job_id: i32, status: &str) -> AppResult<ServiceJob> {
        let status: JobStatus = status.parse()?;
        let job = self.get(job_id).await?;

        match (job.job_status, status) {
            (JobStatus::Completed, JobStatus::InProgress) => Err(invalid_argument(format!(
                "job {} is already completed and cannot be reopened",
                job_id
            ))),
            (JobStatus::InProgress, JobStatus::InProgress) => Ok(job),
            (_, JobStatus::Completed) => self.complete(job_id, Utc::now()).await,
        }
    }

    pub async fn update_labor_charge(
        &self,
        job_id: i32,
        labor_charge: Decimal,
    ) -> AppResult<ServiceJob> {
        validate_amount("labor_charge", labor_charge)?;
        self.store
            .set_labor_charge(job_id, labor_charge)
            .await?
            .ok_or_else(|| not_found_error("Service job", job_id))
    }

    /// Sin guarda de idempotencia: una segunda llamada sobrescribe `end_time`
    pub async fn complete(&self, job_id: i32, end_time: DateTime<Utc>) -> AppResult<ServiceJob> {
        let job = self
            .store
            .set_job_status(job_id, JobStatus::Completed, Some(end_time))
            .await?
            .ok_or_else(|| not_found_error("Service job", job_id))?;
        tracing::info!(job_id, labor_charge = %job.labor_charge, "✅ Job completed");
        Ok(job)
    }

    async fn ensure_employee(&self, employee_id: i32) -> AppResult<()> {
        if self.store.find_employee(employee_id).await?.is_none() {
            return Err(not_found_error("Employee", employee_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCustomer, NewServiceRequest, NewVehicle, RequestStatus};
    use crate::repositories::{CustomerRepository, MemoryStore, VehicleRepository};
    use crate::utils::errors::AppError;

    async fn store_with_request() -> (Arc<MemoryStore>, ServiceJob) {
        let store = Arc::new(MemoryStore::new());
        let customer = store
            .create_customer(&NewCustomer {
                name: "Ana".to_string(),
                phone: "555-0100".to_string(),
                email: None,
                address: None,
            })
            .await
            .unwrap();
        let vehicle = store
            .create_vehicle(&NewVehicle {
                customer_id: customer.customer_id,
                plate_no: "XY-001".to_string(),
                brand: "Honda".to_string(),
                model: "Civic".to_string(),
                year: None,
                color: None,
            })
            .await
            .unwrap();
        let (_, job) = store
            .create_request_with_job(&NewServiceRequest {
                vehicle_id: vehicle.vehicle_id,
                service_type: "Inspection".to_string(),
                problem_note: None,
                priority: "Normal".to_string(),
                status: RequestStatus::Pending,
                assigned_employee_id: None,
            })
            .await
            .unwrap();
        (store, job)
    }

    #[tokio::test]
    async fn test_completed_job_cannot_be_reopened() {
        let (store, job) = store_with_request().await;
        let jobs = ServiceJobController::new(store);

        let completed = jobs.update_status(job.job_id, "Completed").await.unwrap();
        assert!(completed.is_completed());
        assert!(completed.end_time.is_some());

        let err = jobs.update_status(job.job_id, "In Progress").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_negative_labor_charge_is_rejected() {
        let (store, job) = store_with_request().await;
        let jobs = ServiceJobController::new(store);

        let err = jobs
            .update_labor_charge(job.job_id, Decimal::new(-1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(jobs.get(job.job_id).await.unwrap().labor_charge, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_assign_unknown_employee_is_not_found() {
        let (store, job) = store_with_request().await;
        let jobs = ServiceJobController::new(store);

        let err = jobs.assign_employee(job.job_id, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_argument() {
        let (store, job) = store_with_request().await;
        let jobs = ServiceJobController::new(store);

        let err = jobs.update_status(job.job_id, "Paused").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
