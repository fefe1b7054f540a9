//! Libro de inventario
//!
//! Stock por artículo con incrementos y descuentos atómicos. El descuento
//! nunca deja la cantidad por debajo de cero.

use std::sync::Arc;

use validator::Validate;

use crate::dto::inventory_dto::{
    CreatePartRequest, PartResponse, StockMode, UpdatePartRequest, UpdateStockRequest,
};
use crate::models::{NewPart, Part, PartChanges};
use crate::repositories::{InventoryRepository, Store};
use crate::utils::errors::{invalid_argument, not_found_error, AppResult};
use crate::utils::validation::{
    validate_amount, validate_non_negative_quantity, validate_required,
};

const DEFAULT_QUANTITY_LABEL: &str = "pcs";

pub struct InventoryController {
    store: Arc<dyn Store>,
}

impl InventoryController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<PartResponse>> {
        let parts = self.store.list_parts().await?;
        Ok(parts.into_iter().map(PartResponse::from).collect())
    }

    /// Artículos en o bajo su nivel de reposición, el mayor déficit primero
    pub async fn list_low_stock(&self) -> AppResult<Vec<PartResponse>> {
        let parts = self.store.list_low_stock_parts().await?;
        Ok(parts.into_iter().map(PartResponse::from).collect())
    }

    pub async fn get(&self, part_id: i32) -> AppResult<PartResponse> {
        self.find(part_id).await.map(PartResponse::from)
    }

    pub async fn add(&self, request: CreatePartRequest) -> AppResult<PartResponse> {
        request.validate()?;
        validate_amount("unit_price", request.unit_price)?;
        validate_non_negative_quantity("quantity_in_stock", request.quantity_in_stock)?;
        validate_non_negative_quantity("reorder_level", request.reorder_level)?;

        let part = self
            .store
            .insert_part(&NewPart {
                part_name: validate_required("part_name", &request.part_name)?,
                part_code: validate_required("part_code", &request.part_code)?,
                brand: request.brand,
                unit_price: request.unit_price,
                quantity_in_stock: request.quantity_in_stock,
                quantity_label: request
                    .quantity_label
                    .unwrap_or_else(|| DEFAULT_QUANTITY_LABEL.to_string()),
                reorder_level: request.reorder_level,
                description: request.description,
                image_url: request.image_url,
            })
            .await?;

        tracing::info!(part_id = part.part_id, code = %part.part_code, "📦 Part added");
        Ok(part.into())
    }

    /// Sólo se actualizan los campos presentes
    pub async fn update_fields(
        &self,
        part_id: i32,
        request: UpdatePartRequest,
    ) -> AppResult<PartResponse> {
        request.validate()?;
        let changes = PartChanges::from(request);
        if changes.is_empty() {
            return Err(invalid_argument("no fields to update"));
        }
        if let Some(price) = changes.unit_price {
            validate_amount("unit_price", price)?;
        }
        if let Some(quantity) = changes.quantity_in_stock {
            validate_non_negative_quantity("quantity_in_stock", quantity)?;
        }
        if let Some(level) = changes.reorder_level {
            validate_non_negative_quantity("reorder_level", level)?;
        }

        let part = self
            .store
            .update_part(part_id, &changes)
            .await?
            .ok_or_else(|| not_found_error("Part", part_id))?;
        Ok(part.into())
    }

    /// Ajuste por delta (negativo descuenta) o cantidad absoluta
    pub async fn update_stock(
        &self,
        part_id: i32,
        request: UpdateStockRequest,
    ) -> AppResult<PartResponse> {
        let part = match request.mode {
            StockMode::Absolute => self.set_quantity(part_id, request.quantity).await?,
            StockMode::Delta if request.quantity > 0 => {
                self.increment(part_id, request.quantity).await?
            }
            StockMode::Delta if request.quantity < 0 => {
                let quantity = request
                    .quantity
                    .checked_neg()
                    .ok_or_else(|| invalid_argument("quantity out of range"))?;
                self.decrement(part_id, quantity).await?
            }
            StockMode::Delta => self.find(part_id).await?,
        };
        Ok(part.into())
    }

    /// Falla con `InsufficientStock` si no alcanza; el stock queda intacto
    pub async fn decrement(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        validate_non_negative_quantity("quantity", quantity)?;
        let part = self.store.decrement_stock(part_id, quantity).await?;
        tracing::info!(
            part_id,
            quantity,
            remaining = part.quantity_in_stock,
            "Stock decremented"
        );
        Ok(part)
    }

    pub async fn increment(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        validate_non_negative_quantity("quantity", quantity)?;
        let part = self.store.increment_stock(part_id, quantity).await?;
        tracing::info!(
            part_id,
            quantity,
            remaining = part.quantity_in_stock,
            "Stock incremented"
        );
        Ok(part)
    }

    pub async fn set_quantity(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        validate_non_negative_quantity("quantity", quantity)?;
        self.store.set_stock(part_id, quantity).await
    }

    pub async fn delete(&self, part_id: i32) -> AppResult<()> {
        if !self.store.delete_part(part_id).await? {
            return Err(not_found_error("Part", part_id));
        }
        tracing::info!(part_id, "🗑️ Part deleted");
        Ok(())
    }

    async fn find(&self, part_id: i32) -> AppResult<Part> {
        self.store
            .find_part(part_id)
            .await?
            .ok_or_else(|| not_found_error("Part", part_id))
    }
}
