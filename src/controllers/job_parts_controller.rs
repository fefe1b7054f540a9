//! Diario de consumo de artículos por trabajo
//!
//! Cada consumo congela el precio unitario del momento y descuenta stock en
//! la misma transacción; borrarlo devuelve exactamente esa cantidad.

use std::sync::Arc;

use rust_decimal::Decimal;
use validator::Validate;

use crate::dto::job_parts_dto::{AddPartUsageByPlateRequest, AddPartUsageRequest};
use crate::models::{PartUsage, PartUsageDetail};
use crate::repositories::{
    InventoryRepository, JobPartsRepository, ServiceJobRepository, Store, VehicleRepository,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_positive_quantity;

pub struct JobPartsController {
    store: Arc<dyn Store>,
}

impl JobPartsController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_for_job(&self, job_id: i32) -> AppResult<Vec<PartUsageDetail>> {
        if self.store.find_job(job_id).await?.is_none() {
            return Err(not_found_error("Service job", job_id));
        }
        self.store.list_usages_for_job(job_id).await
    }

    pub async fn add_usage(&self, request: AddPartUsageRequest) -> AppResult<PartUsageDetail> {
        request.validate()?;
        self.record(request.job_id, request.part_id, request.quantity_used)
            .await
    }

    /// Resuelve el trabajo activo del vehículo tras verificar que la
    /// matrícula pertenece al cliente
    pub async fn add_usage_by_plate(
        &self,
        request: AddPartUsageByPlateRequest,
    ) -> AppResult<PartUsageDetail> {
        request.validate()?;
        let plate_no = request.plate_no.trim();

        let vehicle = self
            .store
            .find_vehicle_by_plate(plate_no)
            .await?
            .filter(|v| v.customer_id == request.customer_id)
            .ok_or_else(|| AppError::OwnershipMismatch {
                plate_no: plate_no.to_string(),
                customer_id: request.customer_id,
            })?;

        let job = self
            .store
            .active_job_for_vehicle(vehicle.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NoActiveJob {
                plate_no: vehicle.plate_no.clone(),
            })?;

        tracing::info!(
            plate_no = %vehicle.plate_no,
            job_id = job.job_id,
            "🔎 Active job resolved from plate"
        );
        self.record(job.job_id, request.part_id, request.quantity_used)
            .await
    }

    pub async fn remove_usage(&self, usage_id: i32) -> AppResult<PartUsage> {
        let usage = self.store.remove_usage(usage_id).await?;
        tracing::info!(
            usage_id,
            part_id = usage.part_id,
            restored = usage.quantity_used,
            "↩️ Part usage removed, stock restored"
        );
        Ok(usage)
    }

    /// Suma de `quantity_used × unit_price_at_time`; cero si no hay consumos
    pub async fn total_cost(&self, job_id: i32) -> AppResult<Decimal> {
        self.store.total_parts_cost(job_id).await
    }

    async fn record(&self, job_id: i32, part_id: i32, quantity: i32) -> AppResult<PartUsageDetail> {
        validate_positive_quantity("quantity_used", quantity)?;

        let usage = self.store.record_usage(job_id, part_id, quantity).await?;
        tracing::info!(
            job_id,
            part_id,
            quantity,
            unit_price = %usage.unit_price_at_time,
            "🔧 Part consumed"
        );

        let part = self
            .store
            .find_part(part_id)
            .await?
            .ok_or_else(|| not_found_error("Part", part_id))?;
        Ok(PartUsageDetail {
            usage,
            part_name: part.part_name,
            part_code: part.part_code,
            brand: part.brand,
        })
    }
}
