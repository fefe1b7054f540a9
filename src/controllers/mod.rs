//! Controladores del motor de taller
//!
//! Cada controlador encapsula un componente del flujo y sólo conoce el
//! `Store` compartido.

pub mod billing_controller;
pub mod customer_controller;
pub mod dashboard_controller;
pub mod inventory_controller;
pub mod job_parts_controller;
pub mod service_job_controller;
pub mod service_request_controller;

pub use billing_controller::BillingController;
pub use customer_controller::CustomerController;
pub use dashboard_controller::DashboardController;
pub use inventory_controller::InventoryController;
pub use job_parts_controller::JobPartsController;
pub use service_job_controller::ServiceJobController;
pub use service_request_controller::ServiceRequestController;
