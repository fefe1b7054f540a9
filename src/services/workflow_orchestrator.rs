//! Orquestador del flujo de cierre
//!
//! Cuando una solicitud pasa a `Completed`: localizar su trabajo más
//! reciente, fijar la mano de obra, completar el trabajo y generar la
//! factura. Los pasos ya persistidos no se deshacen si la facturación falla;
//! el fallo viaja en el resultado para que el llamador pueda reintentar.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::controllers::billing_controller::BillingController;
use crate::controllers::service_job_controller::ServiceJobController;
use crate::models::{Bill, ServiceJob, ServiceRequest};
use crate::repositories::{ServiceJobRepository, Store};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_amount;

/// Paso del flujo que falló sin revertir los anteriores
#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    pub code: &'static str,
    pub message: String,
}

impl From<&AppError> for StepFailure {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Resultado de un cambio de estado de solicitud
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub request: ServiceRequest,
    pub job: Option<ServiceJob>,
    pub bill: Option<Bill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_error: Option<StepFailure>,
}

impl WorkflowOutcome {
    /// Sin cierre: ni trabajo ni factura tocados
    pub fn unchanged(request: ServiceRequest) -> Self {
        Self {
            request,
            job: None,
            bill: None,
            billing_error: None,
        }
    }
}

pub struct WorkflowOrchestrator {
    store: Arc<dyn Store>,
    jobs: ServiceJobController,
    billing: BillingController,
}

impl WorkflowOrchestrator {
    pub fn new(store: Arc<dyn Store>, tax_rate: Decimal) -> Self {
        Self {
            jobs: ServiceJobController::new(store.clone()),
            billing: BillingController::new(store.clone(), tax_rate),
            store,
        }
    }

    /// Cierre de la solicitud ya marcada como completada
    pub async fn complete_request(
        &self,
        request: ServiceRequest,
        labor_charge: Decimal,
    ) -> AppResult<WorkflowOutcome> {
        validate_amount("labor_charge", labor_charge)?;
        let request_id = request.request_id;

        let job = match self.store.latest_job_for_request(request_id).await? {
            Some(job) => job,
            None => {
                tracing::info!(request_id, "Request completed without a job, billing skipped");
                return Ok(WorkflowOutcome::unchanged(request));
            }
        };

        self.jobs.update_labor_charge(job.job_id, labor_charge).await?;
        let job = self.jobs.complete(job.job_id, Utc::now()).await?;

        match self.billing.generate(job.job_id, None).await {
            Ok(bill) => {
                tracing::info!(
                    request_id,
                    job_id = job.job_id,
                    bill_id = bill.bill_id,
                    "✅ Request closed and billed"
                );
                Ok(WorkflowOutcome {
                    request,
                    job: Some(job),
                    bill: Some(bill),
                    billing_error: None,
                })
            }
            Err(err) => {
                tracing::warn!(
                    request_id,
                    job_id = job.job_id,
                    error = %err,
                    "⚠️ Billing failed after job completion; earlier steps kept"
                );
                Ok(WorkflowOutcome {
                    request,
                    job: Some(job),
                    bill: None,
                    billing_error: Some(StepFailure::from(&err)),
                })
            }
        }
    }
}
