//! Modelo de Vehicle
//!
//! La matrícula (`plate_no`) es única y se compara sin distinguir
//! mayúsculas de minúsculas.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub vehicle_id: i32,
    pub customer_id: i32,
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
}

impl Vehicle {
    /// Compara matrículas sin distinguir mayúsculas
    pub fn plate_matches(&self, plate_no: &str) -> bool {
        self.plate_no.to_lowercase() == plate_no.trim().to_lowercase()
    }
}

/// Vehículo con el nombre y teléfono de su dueño
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// Datos para insertar un vehículo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub customer_id: i32,
    pub plate_no: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_matches_ignores_case() {
        let vehicle = Vehicle {
            vehicle_id: 7,
            customer_id: 9,
            plate_no: "AB-123".to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: Some(2022),
            color: None,
        };
        assert!(vehicle.plate_matches("ab-123"));
        assert!(vehicle.plate_matches(" AB-123 "));
        assert!(!vehicle.plate_matches("AB-124"));
    }
}
