//! Clientes, vehículos y empleados
//!
//! Altas y consultas simples; las matrículas se comparan sin distinguir
//! mayúsculas.

use std::sync::Arc;

use validator::Validate;

use crate::dto::customer_dto::{
    CreateCustomerRequest, CreateEmployeeRequest, CreateVehicleRequest, VehicleDetails,
};
use crate::models::{
    Customer, Employee, NewCustomer, NewEmployee, NewVehicle, Vehicle, VehicleWithOwner,
};
use crate::repositories::{CustomerRepository, EmployeeRepository, Store, VehicleRepository};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_required;

pub struct CustomerController {
    store: Arc<dyn Store>,
}

impl CustomerController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_customer(&self, request: CreateCustomerRequest) -> AppResult<Customer> {
        request.validate()?;
        let customer = self
            .store
            .create_customer(&NewCustomer {
                name: validate_required("name", &request.name)?,
                phone: validate_required("phone", &request.phone)?,
                email: request.email,
                address: request.address,
            })
            .await?;
        tracing::info!(customer_id = customer.customer_id, "👤 Customer created");
        Ok(customer)
    }

    pub async fn get_customer(&self, customer_id: i32) -> AppResult<Customer> {
        self.store
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| not_found_error("Customer", customer_id))
    }

    /// Los clientes más recientes primero
    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        self.store.list_customers().await
    }

    pub async fn create_vehicle(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;
        self.get_customer(request.customer_id).await?;
        self.register_vehicle(request.customer_id, request.details)
            .await
    }

    /// Alta de vehículo para un cliente ya existente
    pub(crate) async fn register_vehicle(
        &self,
        customer_id: i32,
        details: VehicleDetails,
    ) -> AppResult<Vehicle> {
        let vehicle = self
            .store
            .create_vehicle(&NewVehicle {
                customer_id,
                plate_no: validate_required("plate_no", &details.plate_no)?,
                brand: validate_required("brand", &details.brand)?,
                model: validate_required("model", &details.model)?,
                year: details.year,
                color: details.color,
            })
            .await?;
        tracing::info!(
            vehicle_id = vehicle.vehicle_id,
            plate_no = %vehicle.plate_no,
            "🚗 Vehicle registered"
        );
        Ok(vehicle)
    }

    pub async fn get_vehicle(&self, vehicle_id: i32) -> AppResult<Vehicle> {
        self.store
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))
    }

    pub async fn list_vehicles(&self) -> AppResult<Vec<VehicleWithOwner>> {
        self.store.list_vehicles().await
    }

    pub async fn find_vehicle_by_plate(&self, plate_no: &str) -> AppResult<Vehicle> {
        self.store
            .find_vehicle_by_plate(plate_no)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with plate '{}' not found", plate_no.trim()))
            })
    }

    pub async fn create_employee(&self, request: CreateEmployeeRequest) -> AppResult<Employee> {
        request.validate()?;
        self.store
            .create_employee(&NewEmployee {
                name: validate_required("name", &request.name)?,
                position: request.position,
                phone: request.phone,
            })
            .await
    }

    pub async fn get_employee(&self, employee_id: i32) -> AppResult<Employee> {
        self.store
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| not_found_error("Employee", employee_id))
    }
}
