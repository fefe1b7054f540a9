//! Resumen del taller para el panel de control

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contadores y totales de facturación en un instante dado
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DashboardStats {
    pub customers_count: i64,
    pub vehicles_count: i64,
    /// Solicitudes en `Pending`
    pub pending_requests: i64,
    /// Trabajos en `In Progress`
    pub active_jobs: i64,
    /// Artículos en o bajo su nivel de reposición
    pub low_stock_items: i64,
    /// Suma de `total_amount` de las facturas sin pagar
    pub unpaid_total: Decimal,
    /// Suma de `total_amount` de las facturas pagadas
    pub total_revenue: Decimal,
}
