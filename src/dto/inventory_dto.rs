use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Part, PartChanges};

// Request para dar de alta un artículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 100))]
    pub part_name: String,
    #[validate(length(min = 1, max = 50))]
    pub part_code: String,
    pub brand: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub quantity_in_stock: i32,
    pub quantity_label: Option<String>,
    #[serde(default)]
    pub reorder_level: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// Request para actualizar campos de un artículo (sólo los presentes)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 100))]
    pub part_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub quantity_label: Option<String>,
    pub reorder_level: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<UpdatePartRequest> for PartChanges {
    fn from(request: UpdatePartRequest) -> Self {
        Self {
            part_name: request.part_name,
            part_code: request.part_code,
            brand: request.brand,
            unit_price: request.unit_price,
            quantity_in_stock: request.quantity_in_stock,
            quantity_label: request.quantity_label,
            reorder_level: request.reorder_level,
            description: request.description,
            image_url: request.image_url,
        }
    }
}

/// Cómo interpretar la cantidad de un ajuste de stock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMode {
    /// Suma o resta la cantidad (negativa = descuento)
    #[default]
    Delta,
    /// Fija la cantidad exacta
    Absolute,
}

// Request para ajustar el stock
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: i32,
    #[serde(default)]
    pub mode: StockMode,
}

// Response de artículo con indicador de stock bajo
#[derive(Debug, Clone, Serialize)]
pub struct PartResponse {
    #[serde(flatten)]
    pub part: Part,
    pub low_stock: bool,
}

impl From<Part> for PartResponse {
    fn from(part: Part) -> Self {
        let low_stock = part.is_low_stock();
        Self { part, low_stock }
    }
}
