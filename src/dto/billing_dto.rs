use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::AmountChanges;

// Request para generar la factura de un trabajo
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBillRequest {
    pub job_id: i32,
    /// Fracción (0.18 = 18%); si falta se usa la tasa configurada
    pub tax_rate: Option<Decimal>,
}

// Request para corregir importes; el total siempre se recalcula
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UpdateBillAmountsRequest {
    pub subtotal_labor: Option<Decimal>,
    pub subtotal_parts: Option<Decimal>,
    pub tax: Option<Decimal>,
}

impl From<UpdateBillAmountsRequest> for AmountChanges {
    fn from(request: UpdateBillAmountsRequest) -> Self {
        Self {
            subtotal_labor: request.subtotal_labor,
            subtotal_parts: request.subtotal_parts,
            tax: request.tax,
        }
    }
}
