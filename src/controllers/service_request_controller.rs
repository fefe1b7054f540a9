//! Ciclo de vida de las solicitudes de servicio
//!
//! Crear una solicitud crea su trabajo en la misma unidad atómica. Pasar a
//! `Completed` dispara el orquestador de cierre.

use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use super::customer_controller::CustomerController;
use super::service_job_controller::ServiceJobController;
use crate::dto::service_request_dto::{
    CreateServiceRequestRequest, IntakeCreated, IntakeRequest, RequestListQuery,
    ServiceRequestCreated, ServiceRequestDetail, UpdateRequestStatusRequest,
    UpdateServiceRequestRequest,
};
use crate::models::service_request::DEFAULT_PRIORITY;
use crate::models::{
    NewServiceRequest, RequestChanges, RequestFilter, RequestStatus, ServiceJob, ServiceRequest,
    ServiceRequestSummary,
};
use crate::repositories::{
    EmployeeRepository, ServiceJobRepository, ServiceRequestRepository, Store, VehicleRepository,
};
use crate::services::{WorkflowOrchestrator, WorkflowOutcome};
use crate::utils::errors::{invalid_argument, not_found_error, AppResult};
use crate::utils::validation::{validate_amount, validate_required};

pub struct ServiceRequestController {
    store: Arc<dyn Store>,
    orchestrator: WorkflowOrchestrator,
}

/// Campos comunes de una solicitud nueva antes de resolver el vehículo
struct RequestFields {
    service_type: String,
    problem_note: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    assigned_employee_id: Option<i32>,
}

impl ServiceRequestController {
    pub fn new(store: Arc<dyn Store>, tax_rate: Decimal) -> Self {
        Self {
            orchestrator: WorkflowOrchestrator::new(store.clone(), tax_rate),
            store,
        }
    }

    pub async fn create(
        &self,
        request: CreateServiceRequestRequest,
    ) -> AppResult<ServiceRequestCreated> {
        request.validate()?;
        if self.store.find_vehicle(request.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", request.vehicle_id));
        }

        let (request, job) = self
            .open(
                request.vehicle_id,
                RequestFields {
                    service_type: request.service_type,
                    problem_note: request.problem_note,
                    priority: request.priority,
                    status: request.status,
                    assigned_employee_id: request.assigned_employee_id,
                },
            )
            .await?;
        Ok(ServiceRequestCreated { request, job })
    }

    /// Recepción: cliente, vehículo y solicitud. Cliente y vehículo se
    /// confirman por separado antes de la unidad solicitud+trabajo.
    pub async fn create_with_intake(&self, intake: IntakeRequest) -> AppResult<IntakeCreated> {
        intake.validate()?;
        if let Some(employee_id) = intake.assigned_employee_id {
            self.ensure_employee(employee_id).await?;
        }

        let customers = CustomerController::new(self.store.clone());
        let customer = customers.create_customer(intake.customer).await?;
        let vehicle = customers
            .register_vehicle(customer.customer_id, intake.vehicle)
            .await?;

        let (request, job) = self
            .open(
                vehicle.vehicle_id,
                RequestFields {
                    service_type: intake.service_type,
                    problem_note: intake.problem_note,
                    priority: intake.priority,
                    status: None,
                    assigned_employee_id: intake.assigned_employee_id,
                },
            )
            .await?;

        Ok(IntakeCreated {
            customer,
            vehicle,
            request,
            job,
        })
    }

    pub async fn get(
        &self,
        request_id: i32,
        include_employees: bool,
    ) -> AppResult<ServiceRequestDetail> {
        let summary = self
            .store
            .find_request_summary(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", request_id))?;

        let employees = if include_employees {
            Some(self.store.employees_for_request(request_id).await?)
        } else {
            None
        };

        Ok(ServiceRequestDetail { summary, employees })
    }

    pub async fn list(&self, query: RequestListQuery) -> AppResult<Vec<ServiceRequestSummary>> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<RequestStatus>)
            .transpose()?;
        let search = query
            .search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());

        self.store
            .list_requests(&RequestFilter {
                status,
                search,
                customer_id: query.customer_id,
                vehicle_id: query.vehicle_id,
            })
            .await
    }

    /// Actualización parcial; si el estado pasa a `Completed` desde otro
    /// estado se ejecuta el cierre. Sin cierre, `labor_charge` se aplica al
    /// trabajo más reciente de la solicitud.
    pub async fn update(
        &self,
        request_id: i32,
        update: UpdateServiceRequestRequest,
    ) -> AppResult<WorkflowOutcome> {
        update.validate()?;
        if let Some(labor_charge) = update.labor_charge {
            validate_amount("labor_charge", labor_charge)?;
        }

        let changes = RequestChanges {
            service_type: update
                .service_type
                .as_deref()
                .map(|v| validate_required("service_type", v))
                .transpose()?,
            problem_note: update.problem_note,
            priority: update.priority,
            status: update
                .status
                .as_deref()
                .map(str::parse::<RequestStatus>)
                .transpose()?,
            vehicle_id: update.vehicle_id,
        };
        if let Some(vehicle_id) = changes.vehicle_id {
            if self.store.find_vehicle(vehicle_id).await?.is_none() {
                return Err(not_found_error("Vehicle", vehicle_id));
            }
        }

        let current = self.find(request_id).await?;
        let target = changes.status.unwrap_or(current.status);
        let completing = target == RequestStatus::Completed && current.status != target;

        // el trabajo se resuelve antes de escribir nada
        let labor_job = match update.labor_charge {
            Some(_) if !completing => Some(self.labor_target(request_id, target).await?),
            _ => None,
        };

        let updated = if changes.is_empty() {
            current
        } else {
            let updated = self
                .store
                .update_request(request_id, &changes)
                .await?
                .ok_or_else(|| not_found_error("Service request", request_id))?;
            tracing::info!(request_id, status = %updated.status, "📝 Service request updated");
            updated
        };

        if completing {
            let labor_charge = update.labor_charge.unwrap_or(Decimal::ZERO);
            return self
                .orchestrator
                .complete_request(updated, labor_charge)
                .await;
        }

        match (labor_job, update.labor_charge) {
            (Some(job), Some(labor_charge)) => {
                let job = ServiceJobController::new(self.store.clone())
                    .update_labor_charge(job.job_id, labor_charge)
                    .await?;
                tracing::info!(
                    request_id,
                    job_id = job.job_id,
                    labor_charge = %labor_charge,
                    "🔧 Labor charge updated"
                );
                Ok(WorkflowOutcome {
                    request: updated,
                    job: Some(job),
                    bill: None,
                    billing_error: None,
                })
            }
            _ => Ok(WorkflowOutcome::unchanged(updated)),
        }
    }

    /// Cada paso a `Completed` ejecuta el cierre, aunque ya estuviera completada
    pub async fn update_status(
        &self,
        request_id: i32,
        update: UpdateRequestStatusRequest,
    ) -> AppResult<WorkflowOutcome> {
        let status: RequestStatus = update.status.parse()?;
        let labor_charge = update.labor_charge.unwrap_or(Decimal::ZERO);
        validate_amount("labor_charge", labor_charge)?;

        let request = self
            .store
            .set_request_status(request_id, status)
            .await?
            .ok_or_else(|| not_found_error("Service request", request_id))?;
        tracing::info!(request_id, status = %status, "🔄 Service request status changed");

        if status == RequestStatus::Completed {
            return self
                .orchestrator
                .complete_request(request, labor_charge)
                .await;
        }
        Ok(WorkflowOutcome::unchanged(request))
    }

    /// Bloqueado mientras algún trabajo referencie la solicitud
    pub async fn delete(&self, request_id: i32) -> AppResult<()> {
        if !self.store.delete_request(request_id).await? {
            return Err(not_found_error("Service request", request_id));
        }
        tracing::info!(request_id, "🗑️ Service request deleted");
        Ok(())
    }

    async fn open(
        &self,
        vehicle_id: i32,
        fields: RequestFields,
    ) -> AppResult<(ServiceRequest, ServiceJob)> {
        let service_type = validate_required("service_type", &fields.service_type)?;
        let status = fields
            .status
            .as_deref()
            .map(str::parse::<RequestStatus>)
            .transpose()?
            .unwrap_or(RequestStatus::Pending);
        let priority = fields
            .priority
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
        if let Some(employee_id) = fields.assigned_employee_id {
            self.ensure_employee(employee_id).await?;
        }

        let (request, job) = self
            .store
            .create_request_with_job(&NewServiceRequest {
                vehicle_id,
                service_type,
                problem_note: fields.problem_note,
                priority,
                status,
                assigned_employee_id: fields.assigned_employee_id,
            })
            .await?;

        tracing::info!(
            request_id = request.request_id,
            job_id = job.job_id,
            vehicle_id,
            "🆕 Service request opened with its job"
        );
        Ok((request, job))
    }

    /// Trabajo que recibe la mano de obra fuera del cierre; una solicitud
    /// cerrada ya no admite cambios de importe
    async fn labor_target(&self, request_id: i32, status: RequestStatus) -> AppResult<ServiceJob> {
        if status.is_terminal() {
            return Err(invalid_argument(format!(
                "labor_charge cannot change on a {} request",
                status
            )));
        }
        self.store
            .latest_job_for_request(request_id)
            .await?
            .ok_or_else(|| {
                invalid_argument(format!(
                    "service request '{}' has no job to carry labor_charge",
                    request_id
                ))
            })
    }

    async fn find(&self, request_id: i32) -> AppResult<ServiceRequest> {
        self.store
            .find_request(request_id)
            .await?
            .ok_or_else(|| not_found_error("Service request", request_id))
    }

    async fn ensure_employee(&self, employee_id: i32) -> AppResult<()> {
        if self.store.find_employee(employee_id).await?.is_none() {
            return Err(not_found_error("Employee", employee_id));
        }
        Ok(())
    }
}
