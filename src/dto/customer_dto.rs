use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_license_plate;

// Request para registrar un cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 30))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
}

// Datos del vehículo cuando el cliente ya está identificado
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleDetails {
    #[validate(custom = "validate_license_plate")]
    pub plate_no: String,
    #[validate(length(min = 1, max = 50))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub color: Option<String>,
}

// Request para registrar un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub customer_id: i32,
    #[serde(flatten)]
    #[validate]
    pub details: VehicleDetails,
}

// Request para registrar un empleado
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
}
