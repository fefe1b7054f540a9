//! Modelo de Bill (tabla billing)
//!
//! Una factura por trabajo como máximo. `total_amount` siempre es la suma
//! redondeada de mano de obra, repuestos e impuesto; nunca se asigna por
//! separado.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::part_usage::PartUsageDetail;
use super::status::{JobStatus, PaymentStatus};
use crate::utils::errors::{invalid_argument, AppError, AppResult};

/// 18 %
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// 9_999_999_999.99, el mayor valor de una columna NUMERIC(12, 2)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Redondeo monetario a 2 decimales, mitades hacia fuera del cero
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Bill principal - mapea exactamente a la tabla billing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub bill_id: i32,
    pub job_id: i32,
    pub subtotal_labor: Decimal,
    pub subtotal_parts: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub bill_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn amounts(&self) -> BillAmounts {
        BillAmounts {
            subtotal_labor: self.subtotal_labor,
            subtotal_parts: self.subtotal_parts,
            tax: self.tax,
            total_amount: self.total_amount,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Los cuatro importes de una factura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillAmounts {
    pub subtotal_labor: Decimal,
    pub subtotal_parts: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
}

impl BillAmounts {
    /// Calcula impuesto y total a partir de los subtotales
    pub fn compute(
        subtotal_labor: Decimal,
        subtotal_parts: Decimal,
        tax_rate: Decimal,
    ) -> AppResult<Self> {
        let tax = subtotal_labor
            .checked_add(subtotal_parts)
            .and_then(|subtotal| subtotal.checked_mul(tax_rate))
            .map(round_currency)
            .ok_or_else(total_out_of_range)?;
        Self::with_total(subtotal_labor, subtotal_parts, tax)
    }

    /// Sobrescribe los campos presentes y recalcula el total
    pub fn with_changes(&self, changes: &AmountChanges) -> AppResult<Self> {
        Self::with_total(
            changes.subtotal_labor.unwrap_or(self.subtotal_labor),
            changes.subtotal_parts.unwrap_or(self.subtotal_parts),
            changes.tax.unwrap_or(self.tax),
        )
    }

    /// El total tiene que caber en la columna `total_amount`
    fn with_total(
        subtotal_labor: Decimal,
        subtotal_parts: Decimal,
        tax: Decimal,
    ) -> AppResult<Self> {
        let total_amount = subtotal_labor
            .checked_add(subtotal_parts)
            .and_then(|subtotal| subtotal.checked_add(tax))
            .map(round_currency)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(total_out_of_range)?;
        Ok(Self {
            subtotal_labor,
            subtotal_parts,
            tax,
            total_amount,
        })
    }
}

fn total_out_of_range() -> AppError {
    invalid_argument(format!("bill total cannot exceed {}", MAX_AMOUNT))
}

/// Edición explícita de importes; `None` deja el valor actual
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountChanges {
    pub subtotal_labor: Option<Decimal>,
    pub subtotal_parts: Option<Decimal>,
    pub tax: Option<Decimal>,
}

/// Datos para insertar una factura
#[derive(Debug, Clone)]
pub struct NewBill {
    pub job_id: i32,
    pub amounts: BillAmounts,
    pub bill_date: DateTime<Utc>,
}

/// Factura con el contexto de su trabajo, solicitud, vehículo y cliente
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bill: Bill,
    #[sqlx(try_from = "String")]
    pub job_status: JobStatus,
    pub labor_charge: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub service_type: String,
    pub problem_note: Option<String>,
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
}

/// Vista de la factura con el desglose de repuestos del trabajo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillDetail {
    #[serde(flatten)]
    pub view: BillView,
    pub parts_used: Vec<PartUsageDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_default_tax_rate_is_eighteen_percent() {
        assert_eq!(DEFAULT_TAX_RATE, dec("0.18"));
    }

    #[test]
    fn test_compute_labor_only() {
        let amounts = BillAmounts::compute(dec("500"), Decimal::ZERO, DEFAULT_TAX_RATE).unwrap();
        assert_eq!(amounts.tax, dec("90"));
        assert_eq!(amounts.total_amount, dec("590"));
    }

    #[test]
    fn test_compute_rounds_tax_to_cents() {
        // 33.33 * 0.18 = 5.9994
        let amounts = BillAmounts::compute(dec("20.00"), dec("13.33"), DEFAULT_TAX_RATE).unwrap();
        assert_eq!(amounts.tax, dec("6.00"));
        assert_eq!(amounts.total_amount, dec("39.33"));
    }

    #[test]
    fn test_round_currency_midpoint_goes_away_from_zero() {
        assert_eq!(round_currency(dec("0.125")), dec("0.13"));
        assert_eq!(round_currency(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_with_changes_recomputes_total() {
        let amounts = BillAmounts::compute(dec("500"), dec("100"), DEFAULT_TAX_RATE).unwrap();
        let changed = amounts
            .with_changes(&AmountChanges {
                tax: Some(dec("0")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(changed.subtotal_labor, dec("500"));
        assert_eq!(changed.subtotal_parts, dec("100"));
        assert_eq!(changed.total_amount, dec("600"));
    }

    #[test]
    fn test_max_amount_matches_numeric_column() {
        assert_eq!(MAX_AMOUNT, dec("9999999999.99"));
    }

    #[test]
    fn test_compute_rejects_total_beyond_column() {
        let err = BillAmounts::compute(MAX_AMOUNT, MAX_AMOUNT, DEFAULT_TAX_RATE).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_with_changes_rejects_overflowing_sum() {
        let amounts = BillAmounts::compute(dec("100"), dec("0"), DEFAULT_TAX_RATE).unwrap();
        // cada campo por separado es un Decimal válido, la suma no cabe
        let err = amounts
            .with_changes(&AmountChanges {
                subtotal_labor: Some(Decimal::MAX),
                subtotal_parts: Some(Decimal::MAX),
                tax: Some(Decimal::MAX),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
