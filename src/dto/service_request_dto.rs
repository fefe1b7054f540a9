use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::customer_dto::{CreateCustomerRequest, VehicleDetails};
use crate::models::{
    Customer, Employee, ServiceJob, ServiceRequest, ServiceRequestSummary, Vehicle,
};

// Request para abrir una solicitud de servicio
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequestRequest {
    pub vehicle_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_employee_id: Option<i32>,
}

// Request de recepción: cliente nuevo, vehículo nuevo y solicitud
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IntakeRequest {
    #[validate]
    pub customer: CreateCustomerRequest,
    #[validate]
    pub vehicle: VehicleDetails,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub assigned_employee_id: Option<i32>,
}

// Request de actualización general (sólo los campos presentes)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceRequestRequest {
    #[validate(length(min = 1, max = 100))]
    pub service_type: Option<String>,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub vehicle_id: Option<i32>,
    pub labor_charge: Option<Decimal>,
}

// Request de cambio de estado
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: String,
    pub labor_charge: Option<Decimal>,
}

// Filtros de listado
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub vehicle_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetRequestQuery {
    #[serde(default)]
    pub include_employees: bool,
}

// Response de creación: la solicitud y su trabajo
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestCreated {
    pub request: ServiceRequest,
    pub job: ServiceJob,
}

// Response de detalle
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestDetail {
    #[serde(flatten)]
    pub summary: ServiceRequestSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<Employee>>,
}

// Response de recepción completa
#[derive(Debug, Clone, Serialize)]
pub struct IntakeCreated {
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub request: ServiceRequest,
    pub job: ServiceJob,
}
