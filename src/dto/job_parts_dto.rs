use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request para registrar consumo en un trabajo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPartUsageRequest {
    pub job_id: i32,
    pub part_id: i32,
    #[validate(range(min = 1))]
    pub quantity_used: i32,
}

// Request para registrar consumo identificando el vehículo por matrícula
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPartUsageByPlateRequest {
    #[validate(length(min = 1))]
    pub plate_no: String,
    pub customer_id: i32,
    pub part_id: i32,
    #[validate(range(min = 1))]
    pub quantity_used: i32,
}

// Response del coste total de artículos de un trabajo
#[derive(Debug, Clone, Serialize)]
pub struct TotalCostResponse {
    pub job_id: i32,
    pub total_cost: Decimal,
}
