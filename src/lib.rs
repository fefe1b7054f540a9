//! Motor de flujo de trabajo para talleres de vehículos
//!
//! Inventario de repuestos, consumo por trabajo, ciclo de vida de
//! solicitudes y trabajos, facturación y el orquestador que los une.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
