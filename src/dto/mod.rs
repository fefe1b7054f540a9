//! DTOs de la API
//!
//! Payloads de entrada validados con `validator` y envoltorios de respuesta.

pub mod billing_dto;
pub mod customer_dto;
pub mod inventory_dto;
pub mod job_parts_dto;
pub mod response_dto;
pub mod service_job_dto;
pub mod service_request_dto;

pub use response_dto::ApiResponse;
