//! Modelo de Part (artículo de inventario)
//!
//! `quantity_in_stock` nunca puede ser negativo; el libro de inventario
//! comprueba la suficiencia antes de cada descuento.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Part principal - mapea exactamente a la tabla inventory
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub part_id: i32,
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
    pub unit_price: Decimal,
    pub quantity_in_stock: i32,
    pub quantity_label: String,
    pub reorder_level: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl Part {
    /// Stock igual o por debajo del nivel de reorden
    pub fn is_low_stock(&self) -> bool {
        self.quantity_in_stock <= self.reorder_level
    }

    /// Diferencia con el nivel de reorden; los listados de bajo stock
    /// ordenan por este valor ascendente
    pub fn stock_deficit(&self) -> i32 {
        self.quantity_in_stock - self.reorder_level
    }
}

/// Datos para dar de alta un artículo
#[derive(Debug, Clone)]
pub struct NewPart {
    pub part_name: String,
    pub part_code: String,
    pub brand: Option<String>,
    pub unit_price: Decimal,
    pub quantity_in_stock: i32,
    pub quantity_label: String,
    pub reorder_level: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Actualización parcial: `None` deja el valor actual
#[derive(Debug, Clone, Default)]
pub struct PartChanges {
    pub part_name: Option<String>,
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub quantity_label: Option<String>,
    pub reorder_level: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl PartChanges {
    pub fn is_empty(&self) -> bool {
        self.part_name.is_none()
            && self.part_code.is_none()
            && self.brand.is_none()
            && self.unit_price.is_none()
            && self.quantity_in_stock.is_none()
            && self.quantity_label.is_none()
            && self.reorder_level.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
    }

    /// Aplica los campos presentes sobre una copia del artículo
    pub fn apply_to(&self, part: &Part) -> Part {
        let mut updated = part.clone();
        if let Some(ref v) = self.part_name {
            updated.part_name = v.clone();
        }
        if let Some(ref v) = self.part_code {
            updated.part_code = v.clone();
        }
        if let Some(ref v) = self.brand {
            updated.brand = Some(v.clone());
        }
        if let Some(v) = self.unit_price {
            updated.unit_price = v;
        }
        if let Some(v) = self.quantity_in_stock {
            updated.quantity_in_stock = v;
        }
        if let Some(ref v) = self.quantity_label {
            updated.quantity_label = v.clone();
        }
        if let Some(v) = self.reorder_level {
            updated.reorder_level = v;
        }
        if let Some(ref v) = self.description {
            updated.description = Some(v.clone());
        }
        if let Some(ref v) = self.image_url {
            updated.image_url = Some(v.clone());
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brake_pads() -> Part {
        Part {
            part_id: 1,
            part_name: "Brake Pads".to_string(),
            part_code: "BP-001".to_string(),
            brand: Some("Bosch".to_string()),
            unit_price: Decimal::new(4500, 2),
            quantity_in_stock: 4,
            quantity_label: "pcs".to_string(),
            reorder_level: 5,
            description: None,
            image_url: None,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_includes_threshold() {
        let mut part = brake_pads();
        assert!(part.is_low_stock());
        part.quantity_in_stock = 5;
        assert!(part.is_low_stock());
        part.quantity_in_stock = 6;
        assert!(!part.is_low_stock());
        assert_eq!(part.stock_deficit(), 1);
    }

    #[test]
    fn test_changes_only_touch_present_fields() {
        let part = brake_pads();
        let changes = PartChanges {
            unit_price: Some(Decimal::new(5000, 2)),
            ..Default::default()
        };
        let updated = changes.apply_to(&part);
        assert_eq!(updated.unit_price, Decimal::new(5000, 2));
        assert_eq!(updated.part_code, "BP-001");
        assert_eq!(updated.brand.as_deref(), Some("Bosch"));
        assert!(PartChanges::default().is_empty());
        assert!(!changes.is_empty());
    }
}
