use async_trait::async_trait;

use super::postgres::{map_db_error, PgStore};
use crate::models::{NewVehicle, Vehicle, VehicleWithOwner};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> AppResult<Vehicle>;
    async fn find_vehicle(&self, vehicle_id: i32) -> AppResult<Option<Vehicle>>;
    /// Búsqueda por matrícula sin distinguir mayúsculas
    async fn find_vehicle_by_plate(&self, plate_no: &str) -> AppResult<Option<Vehicle>>;
    /// Con nombre y teléfono del dueño, el alta más reciente primero
    async fn list_vehicles(&self) -> AppResult<Vec<VehicleWithOwner>>;
}

#[async_trait]
impl VehicleRepository for PgStore {
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> AppResult<Vehicle> {
        log::debug!(
            "INSERT vehicle plate={} customer_id={}",
            vehicle.plate_no,
            vehicle.customer_id
        );

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (customer_id, plate_no, brand, model, year, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(&vehicle.plate_no)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn find_vehicle(&self, vehicle_id: i32) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn find_vehicle_by_plate(&self, plate_no: &str) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE LOWER(plate_no) = LOWER($1)")
            .bind(plate_no.trim())
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn list_vehicles(&self) -> AppResult<Vec<VehicleWithOwner>> {
        sqlx::query_as::<_, VehicleWithOwner>(
            r#"
            SELECT v.*, c.name AS customer_name, c.phone AS customer_phone
            FROM vehicles v
            LEFT JOIN customers c ON c.customer_id = v.customer_id
            ORDER BY v.vehicle_id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }
}
