//! Utilidades del sistema
//!
//! Manejo de errores y validación compartidos por los controladores.

pub mod errors;
pub mod validation;
