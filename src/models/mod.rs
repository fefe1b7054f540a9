//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! a las tablas PostgreSQL del taller.

pub mod bill;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod part;
pub mod part_usage;
pub mod service_job;
pub mod service_request;
pub mod status;
pub mod vehicle;

pub use bill::{
    round_currency, AmountChanges, Bill, BillAmounts, BillDetail, BillView, NewBill,
    DEFAULT_TAX_RATE, MAX_AMOUNT,
};
pub use customer::{Customer, NewCustomer};
pub use dashboard::DashboardStats;
pub use employee::{Employee, NewEmployee};
pub use part::{NewPart, Part, PartChanges};
pub use part_usage::{PartUsage, PartUsageDetail};
pub use service_job::{JobFilter, ServiceJob};
pub use service_request::{
    NewServiceRequest, RequestChanges, RequestFilter, ServiceRequest, ServiceRequestSummary,
};
pub use status::{JobStatus, PaymentStatus, RequestStatus};
pub use vehicle::{NewVehicle, Vehicle, VehicleWithOwner};
