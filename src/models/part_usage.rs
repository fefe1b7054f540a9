//! Modelo de PartUsage (tabla job_parts_used)
//!
//! `unit_price_at_time` es una copia del precio del artículo en el momento
//! del consumo; cambios posteriores de precio no la afectan.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartUsage {
    pub usage_id: i32,
    pub job_id: i32,
    pub part_id: i32,
    pub quantity_used: i32,
    pub unit_price_at_time: Decimal,
    pub used_at: DateTime<Utc>,
}

impl PartUsage {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity_used) * self.unit_price_at_time
    }
}

/// Consumo con los datos del artículo para listados y desgloses de factura
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartUsageDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub usage: PartUsage,
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
}

/// Suma de `quantity_used × unit_price_at_time`; cero si no hay consumos
pub fn total_cost<'a, I>(usages: I) -> Decimal
where
    I: IntoIterator<Item = &'a PartUsage>,
{
    usages.into_iter().map(PartUsage::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(quantity_used: i32, price_cents: i64) -> PartUsage {
        PartUsage {
            usage_id: 1,
            job_id: 1,
            part_id: 1,
            quantity_used,
            unit_price_at_time: Decimal::new(price_cents, 2),
            used_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_cost_sums_line_totals() {
        let usages = vec![usage(3, 1250), usage(2, 999)];
        assert_eq!(total_cost(&usages), Decimal::new(5748, 2));
    }

    #[test]
    fn test_total_cost_of_nothing_is_zero() {
        let usages: Vec<PartUsage> = Vec::new();
        assert_eq!(total_cost(&usages), Decimal::ZERO);
    }
}
