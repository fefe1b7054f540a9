//! Libro de inventario
//!
//! Toda mutación de stock es una única sentencia UPDATE condicional; el
//! CHECK `quantity_in_stock >= 0` de la tabla respalda el suelo en cero.

use async_trait::async_trait;
use sqlx::PgConnection;

use super::postgres::{map_db_error, PgStore};
use crate::models::{NewPart, Part, PartChanges};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Ordenado por nombre
    async fn list_parts(&self) -> AppResult<Vec<Part>>;
    /// `quantity_in_stock <= reorder_level`, del mayor déficit al menor
    async fn list_low_stock_parts(&self) -> AppResult<Vec<Part>>;
    async fn find_part(&self, part_id: i32) -> AppResult<Option<Part>>;
    async fn insert_part(&self, part: &NewPart) -> AppResult<Part>;
    async fn update_part(&self, part_id: i32, changes: &PartChanges) -> AppResult<Option<Part>>;
    /// Falla con `InsufficientStock` sin tocar el stock
    async fn decrement_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part>;
    async fn increment_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part>;
    async fn set_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part>;
    async fn delete_part(&self, part_id: i32) -> AppResult<bool>;
}

/// Descontar stock sobre una conexión (o transacción) ya abierta
pub(crate) async fn debit_stock(
    conn: &mut PgConnection,
    part_id: i32,
    quantity: i32,
) -> AppResult<Part> {
    let updated = sqlx::query_as::<_, Part>(
        r#"
        UPDATE inventory
        SET quantity_in_stock = quantity_in_stock - $2, last_updated = NOW()
        WHERE part_id = $1 AND quantity_in_stock >= $2
        RETURNING *
        "#,
    )
    .bind(part_id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if let Some(part) = updated {
        return Ok(part);
    }

    let available: Option<i32> =
        sqlx::query_scalar("SELECT quantity_in_stock FROM inventory WHERE part_id = $1")
            .bind(part_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_db_error)?;

    match available {
        None => Err(not_found_error("Part", part_id)),
        Some(available) => Err(AppError::InsufficientStock {
            part_id,
            available,
            requested: quantity,
        }),
    }
}

/// Reponer stock sobre una conexión (o transacción) ya abierta
pub(crate) async fn credit_stock(
    conn: &mut PgConnection,
    part_id: i32,
    quantity: i32,
) -> AppResult<Part> {
    sqlx::query_as::<_, Part>(
        r#"
        UPDATE inventory
        SET quantity_in_stock = quantity_in_stock + $2, last_updated = NOW()
        WHERE part_id = $1
        RETURNING *
        "#,
    )
    .bind(part_id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| not_found_error("Part", part_id))
}

#[async_trait]
impl InventoryRepository for PgStore {
    async fn list_parts(&self) -> AppResult<Vec<Part>> {
        sqlx::query_as::<_, Part>("SELECT * FROM inventory ORDER BY part_name, part_id")
            .fetch_all(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn list_low_stock_parts(&self) -> AppResult<Vec<Part>> {
        sqlx::query_as::<_, Part>(
            r#"
            SELECT * FROM inventory
            WHERE quantity_in_stock <= reorder_level
            ORDER BY (quantity_in_stock - reorder_level) ASC, part_name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn find_part(&self, part_id: i32) -> AppResult<Option<Part>> {
        sqlx::query_as::<_, Part>("SELECT * FROM inventory WHERE part_id = $1")
            .bind(part_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn insert_part(&self, part: &NewPart) -> AppResult<Part> {
        log::debug!("INSERT inventory part_code={}", part.part_code);

        sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO inventory (
                part_name, part_code, brand, unit_price, quantity_in_stock,
                quantity_label, reorder_level, description, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&part.part_name)
        .bind(&part.part_code)
        .bind(&part.brand)
        .bind(part.unit_price)
        .bind(part.quantity_in_stock)
        .bind(&part.quantity_label)
        .bind(part.reorder_level)
        .bind(&part.description)
        .bind(&part.image_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn update_part(&self, part_id: i32, changes: &PartChanges) -> AppResult<Option<Part>> {
        log::debug!("UPDATE inventory part_id={}", part_id);

        sqlx::query_as::<_, Part>(
            r#"
            UPDATE inventory SET
                part_name = COALESCE($2, part_name),
                part_code = COALESCE($3, part_code),
                brand = COALESCE($4, brand),
                unit_price = COALESCE($5, unit_price),
                quantity_in_stock = COALESCE($6, quantity_in_stock),
                quantity_label = COALESCE($7, quantity_label),
                reorder_level = COALESCE($8, reorder_level),
                description = COALESCE($9, description),
                image_url = COALESCE($10, image_url),
                last_updated = NOW()
            WHERE part_id = $1
            RETURNING *
            "#,
        )
        .bind(part_id)
        .bind(&changes.part_name)
        .bind(&changes.part_code)
        .bind(&changes.brand)
        .bind(changes.unit_price)
        .bind(changes.quantity_in_stock)
        .bind(&changes.quantity_label)
        .bind(changes.reorder_level)
        .bind(&changes.description)
        .bind(&changes.image_url)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn decrement_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        log::debug!("DEBIT inventory part_id={} qty={}", part_id, quantity);
        let mut conn = self.pool().acquire().await.map_err(map_db_error)?;
        debit_stock(&mut conn, part_id, quantity).await
    }

    async fn increment_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        log::debug!("CREDIT inventory part_id={} qty={}", part_id, quantity);
        let mut conn = self.pool().acquire().await.map_err(map_db_error)?;
        credit_stock(&mut conn, part_id, quantity).await
    }

    async fn set_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        sqlx::query_as::<_, Part>(
            r#"
            UPDATE inventory
            SET quantity_in_stock = $2, last_updated = NOW()
            WHERE part_id = $1
            RETURNING *
            "#,
        )
        .bind(part_id)
        .bind(quantity)
        .fetch_optional(self.pool())
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| not_found_error("Part", part_id))
    }

    async fn delete_part(&self, part_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM inventory WHERE part_id = $1")
            .bind(part_id)
            .execute(self.pool())
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
