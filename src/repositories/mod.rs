//! Repositorios de persistencia
//!
//! Cada familia de entidades tiene su trait asíncrono. `PgStore` los
//! implementa sobre PostgreSQL y `MemoryStore` sobre estado en memoria;
//! los controladores sólo ven `Arc<dyn Store>`.

pub mod billing_repository;
pub mod customer_repository;
pub mod dashboard_repository;
pub mod employee_repository;
pub mod inventory_repository;
pub mod job_parts_repository;
pub mod memory;
pub mod postgres;
pub mod service_job_repository;
pub mod service_request_repository;
pub mod vehicle_repository;

pub use billing_repository::BillingRepository;
pub use customer_repository::CustomerRepository;
pub use dashboard_repository::DashboardRepository;
pub use employee_repository::EmployeeRepository;
pub use inventory_repository::InventoryRepository;
pub use job_parts_repository::JobPartsRepository;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use service_job_repository::ServiceJobRepository;
pub use service_request_repository::ServiceRequestRepository;
pub use vehicle_repository::VehicleRepository;

/// Acceso completo a la persistencia del taller
pub trait Store:
    CustomerRepository
    + VehicleRepository
    + EmployeeRepository
    + InventoryRepository
    + JobPartsRepository
    + ServiceJobRepository
    + ServiceRequestRepository
    + BillingRepository
    + DashboardRepository
    + Send
    + Sync
{
}

impl<T> Store for T where
    T: CustomerRepository
        + VehicleRepository
        + EmployeeRepository
        + InventoryRepository
        + JobPartsRepository
        + ServiceJobRepository
        + ServiceRequestRepository
        + BillingRepository
        + DashboardRepository
        + Send
        + Sync
{
}
