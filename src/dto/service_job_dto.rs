use rust_decimal::Decimal;
use serde::Deserialize;

// Request para crear un trabajo manualmente
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub request_id: i32,
    pub employee_id: Option<i32>,
    pub labor_charge: Option<Decimal>,
}

// Filtros de listado
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobListQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub completed_without_bill: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignEmployeeRequest {
    pub employee_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLaborChargeRequest {
    pub labor_charge: Decimal,
}
