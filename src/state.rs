//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::{
    BillingController, CustomerController, DashboardController, InventoryController,
    JobPartsController, ServiceJobController, ServiceRequestController,
};
use crate::repositories::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }

    pub fn customers(&self) -> CustomerController {
        CustomerController::new(self.store.clone())
    }

    pub fn inventory(&self) -> InventoryController {
        InventoryController::new(self.store.clone())
    }

    pub fn job_parts(&self) -> JobPartsController {
        JobPartsController::new(self.store.clone())
    }

    pub fn service_jobs(&self) -> ServiceJobController {
        ServiceJobController::new(self.store.clone())
    }

    pub fn service_requests(&self) -> ServiceRequestController {
        ServiceRequestController::new(self.store.clone(), self.config.default_tax_rate)
    }

    pub fn billing(&self) -> BillingController {
        BillingController::new(self.store.clone(), self.config.default_tax_rate)
    }

    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self.store.clone())
    }
}
