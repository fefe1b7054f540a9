//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar los valores numéricos
//! y textuales que llegan al motor antes de tocar la base de datos.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::MAX_AMOUNT;
use crate::utils::errors::{invalid_argument, AppResult};

/// Validar un importe monetario: no negativo, como mucho 2 decimales y
/// dentro de lo que cabe en una columna NUMERIC(12, 2)
pub fn validate_amount(field: &str, value: Decimal) -> AppResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid_argument(format!("{} cannot be negative", field)));
    }
    if value.normalize().scale() > 2 {
        return Err(invalid_argument(format!(
            "{} cannot have more than 2 decimal places, got {}",
            field, value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(invalid_argument(format!(
            "{} cannot exceed {}, got {}",
            field, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

/// Validar que una cantidad sea estrictamente positiva
pub fn validate_positive_quantity(field: &str, value: i32) -> AppResult<()> {
    if value <= 0 {
        return Err(invalid_argument(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Validar que una cantidad no sea negativa
pub fn validate_non_negative_quantity(field: &str, value: i32) -> AppResult<()> {
    if value < 0 {
        return Err(invalid_argument(format!("{} cannot be negative", field)));
    }
    Ok(())
}

/// Validar la tasa de impuesto (fracción entre 0 y 1)
pub fn validate_tax_rate(rate: Decimal) -> AppResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid_argument(format!(
            "tax_rate must be between 0 and 1, got {}",
            rate
        )));
    }
    Ok(())
}

/// Validar que un texto requerido no esté vacío; devuelve el valor recortado
pub fn validate_required(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_argument(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Validar formato de matrícula de vehículo (usado por los DTOs)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 2 || clean_plate.len() > 12 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("labor_charge", dec("0")).is_ok());
        assert!(validate_amount("labor_charge", dec("12.50")).is_ok());
        assert!(validate_amount("labor_charge", dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_amount_bounds_and_scale() {
        assert!(validate_amount("unit_price", dec("9999999999.99")).is_ok());
        assert!(validate_amount("unit_price", dec("10000000000.00")).is_err());
        assert!(validate_amount("unit_price", dec("79228162514264337593543950335")).is_err());
        // ceros de cola no cuentan como decimales
        assert!(validate_amount("unit_price", dec("12.500")).is_ok());
        assert!(validate_amount("unit_price", dec("12.345")).is_err());
        assert!(validate_amount("unit_price", dec("123456789012.345")).is_err());
    }

    #[test]
    fn test_validate_quantities() {
        assert!(validate_positive_quantity("quantity_used", 1).is_ok());
        assert!(validate_positive_quantity("quantity_used", 0).is_err());
        assert!(validate_non_negative_quantity("quantity", 0).is_ok());
        assert!(validate_non_negative_quantity("quantity", -1).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(dec("0.18")).is_ok());
        assert!(validate_tax_rate(dec("0")).is_ok());
        assert!(validate_tax_rate(dec("-0.1")).is_err());
        assert!(validate_tax_rate(dec("1.5")).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("service_type", "  Oil Change ").unwrap(), "Oil Change");
        assert!(validate_required("service_type", "   ").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("AB-123").is_ok());
        assert!(validate_license_plate("A").is_err());
        assert!(validate_license_plate("ABCDEFGHIJKLMN").is_err());
    }
}
