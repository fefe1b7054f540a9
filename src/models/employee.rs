use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mecánico o empleado del taller que puede ser asignado a un trabajo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub employee_id: i32,
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
}
