//! Store en memoria
//!
//! Mismo contrato que `PgStore`: cada operación se ejecuta completa bajo un
//! único `Mutex`, y las restricciones de la base (unicidad, claves foráneas,
//! stock no negativo) se verifican a mano. El candado nunca cruza un `await`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    BillingRepository, CustomerRepository, DashboardRepository, EmployeeRepository,
    InventoryRepository, JobPartsRepository, ServiceJobRepository, ServiceRequestRepository,
    VehicleRepository,
};
use crate::models::part_usage::total_cost;
use crate::models::{
    Bill, BillAmounts, BillView, Customer, DashboardStats, Employee, JobFilter, JobStatus,
    NewBill, NewCustomer, NewEmployee, NewPart, NewServiceRequest, NewVehicle, Part,
    PartChanges, PartUsage, PartUsageDetail, PaymentStatus, RequestChanges, RequestFilter,
    RequestStatus, ServiceJob, ServiceRequest, ServiceRequestSummary, Vehicle, VehicleWithOwner,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i32, Customer>,
    vehicles: BTreeMap<i32, Vehicle>,
    employees: BTreeMap<i32, Employee>,
    parts: BTreeMap<i32, Part>,
    usages: BTreeMap<i32, PartUsage>,
    jobs: BTreeMap<i32, ServiceJob>,
    requests: BTreeMap<i32, ServiceRequest>,
    bills: BTreeMap<i32, Bill>,
    sequences: HashMap<&'static str, i32>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i32 {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn summary(&self, request: &ServiceRequest) -> ServiceRequestSummary {
        let vehicle = self.vehicles.get(&request.vehicle_id);
        let customer = vehicle.and_then(|v| self.customers.get(&v.customer_id));
        let job = self
            .jobs
            .values()
            .filter(|j| j.request_id == request.request_id)
            .max_by_key(|j| j.job_id);

        ServiceRequestSummary {
            request: request.clone(),
            plate_no: vehicle.map(|v| v.plate_no.clone()),
            customer_id: customer.map(|c| c.customer_id),
            customer_name: customer.map(|c| c.name.clone()),
            job_id: job.map(|j| j.job_id),
            assigned_employee_id: job.and_then(|j| j.employee_id),
        }
    }

    /// Mismo JOIN que la vista de PostgreSQL; sin fila si falta algún eslabón
    fn bill_view(&self, bill: &Bill) -> Option<BillView> {
        let job = self.jobs.get(&bill.job_id)?;
        let request = self.requests.get(&job.request_id)?;
        let vehicle = self.vehicles.get(&request.vehicle_id)?;
        let customer = self.customers.get(&vehicle.customer_id)?;

        Some(BillView {
            bill: bill.clone(),
            job_status: job.job_status,
            labor_charge: job.labor_charge,
            start_time: job.start_time,
            end_time: job.end_time,
            service_type: request.service_type.clone(),
            problem_note: request.problem_note.clone(),
            plate_no: vehicle.plate_no.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_email: customer.email.clone(),
        })
    }

    fn ensure_part_code_free(&self, code: &str, except: Option<i32>) -> AppResult<()> {
        let taken = self
            .parts
            .values()
            .any(|p| p.part_code == code && Some(p.part_id) != except);
        if taken {
            return Err(AppError::DuplicateKey("inventory_part_code_key".to_string()));
        }
        Ok(())
    }

    fn debit(&mut self, part_id: i32, quantity: i32) -> AppResult<Part> {
        let part = self
            .parts
            .get_mut(&part_id)
            .ok_or_else(|| not_found_error("Part", part_id))?;
        if part.quantity_in_stock < quantity {
            return Err(AppError::InsufficientStock {
                part_id,
                available: part.quantity_in_stock,
                requested: quantity,
            });
        }
        part.quantity_in_stock -= quantity;
        part.last_updated = Utc::now();
        Ok(part.clone())
    }

    fn credit(&mut self, part_id: i32, quantity: i32) -> AppResult<Part> {
        let part = self
            .parts
            .get_mut(&part_id)
            .ok_or_else(|| not_found_error("Part", part_id))?;
        part.quantity_in_stock = part
            .quantity_in_stock
            .checked_add(quantity)
            .ok_or_else(|| check_violation("inventory_quantity_in_stock_range"))?;
        part.last_updated = Utc::now();
        Ok(part.clone())
    }
}

fn check_violation(constraint: &str) -> AppError {
    AppError::Constraint(constraint.to_string())
}

/// Estado completo del taller en memoria
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn create_customer(&self, customer: &NewCustomer) -> AppResult<Customer> {
        let mut tables = self.lock()?;

        if tables.customers.values().any(|c| c.phone == customer.phone) {
            return Err(AppError::DuplicateKey("customers_phone_key".to_string()));
        }
        if let Some(ref email) = customer.email {
            if tables
                .customers
                .values()
                .any(|c| c.email.as_deref() == Some(email.as_str()))
            {
                return Err(AppError::DuplicateKey("customers_email_key".to_string()));
            }
        }

        let created = Customer {
            customer_id: tables.next_id("customers"),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
            created_at: Utc::now(),
        };
        tables.customers.insert(created.customer_id, created.clone());
        Ok(created)
    }

    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>> {
        Ok(self.lock()?.customers.get(&customer_id).cloned())
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.lock()?.customers.values().cloned().collect();
        customers.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.customer_id.cmp(&a.customer_id))
        });
        Ok(customers)
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> AppResult<Vehicle> {
        let mut tables = self.lock()?;

        if !tables.customers.contains_key(&vehicle.customer_id) {
            return Err(check_violation("vehicles_customer_id_fkey"));
        }
        if tables.vehicles.values().any(|v| v.plate_matches(&vehicle.plate_no)) {
            return Err(AppError::DuplicateKey("vehicles_plate_no_lower_key".to_string()));
        }

        let created = Vehicle {
            vehicle_id: tables.next_id("vehicles"),
            customer_id: vehicle.customer_id,
            plate_no: vehicle.plate_no.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            color: vehicle.color.clone(),
        };
        tables.vehicles.insert(created.vehicle_id, created.clone());
        Ok(created)
    }

    async fn find_vehicle(&self, vehicle_id: i32) -> AppResult<Option<Vehicle>> {
        Ok(self.lock()?.vehicles.get(&vehicle_id).cloned())
    }

    async fn find_vehicle_by_plate(&self, plate_no: &str) -> AppResult<Option<Vehicle>> {
        Ok(self
            .lock()?
            .vehicles
            .values()
            .find(|v| v.plate_matches(plate_no))
            .cloned())
    }

    async fn list_vehicles(&self) -> AppResult<Vec<VehicleWithOwner>> {
        let tables = self.lock()?;
        Ok(tables
            .vehicles
            .values()
            .rev()
            .map(|vehicle| {
                let owner = tables.customers.get(&vehicle.customer_id);
                VehicleWithOwner {
                    vehicle: vehicle.clone(),
                    customer_name: owner.map(|c| c.name.clone()),
                    customer_phone: owner.map(|c| c.phone.clone()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let mut tables = self.lock()?;
        let created = Employee {
            employee_id: tables.next_id("employees"),
            name: employee.name.clone(),
            position: employee.position.clone(),
            phone: employee.phone.clone(),
        };
        tables.employees.insert(created.employee_id, created.clone());
        Ok(created)
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        Ok(self.lock()?.employees.get(&employee_id).cloned())
    }

    async fn employees_for_request(&self, request_id: i32) -> AppResult<Vec<Employee>> {
        let tables = self.lock()?;
        let mut ids: Vec<i32> = tables
            .jobs
            .values()
            .filter(|j| j.request_id == request_id)
            .filter_map(|j| j.employee_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids
            .into_iter()
            .filter_map(|id| tables.employees.get(&id).cloned())
            .collect())
    }
}

#[async_trait]
impl InventoryRepository for MemoryStore {
    async fn list_parts(&self) -> AppResult<Vec<Part>> {
        let mut parts: Vec<Part> = self.lock()?.parts.values().cloned().collect();
        parts.sort_by(|a, b| a.part_name.cmp(&b.part_name).then(a.part_id.cmp(&b.part_id)));
        Ok(parts)
    }

    async fn list_low_stock_parts(&self) -> AppResult<Vec<Part>> {
        let mut parts: Vec<Part> = self
            .lock()?
            .parts
            .values()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect();
        parts.sort_by(|a, b| {
            a.stock_deficit()
                .cmp(&b.stock_deficit())
                .then_with(|| a.part_name.cmp(&b.part_name))
        });
        Ok(parts)
    }

    async fn find_part(&self, part_id: i32) -> AppResult<Option<Part>> {
        Ok(self.lock()?.parts.get(&part_id).cloned())
    }

    async fn insert_part(&self, part: &NewPart) -> AppResult<Part> {
        let mut tables = self.lock()?;

        tables.ensure_part_code_free(&part.part_code, None)?;
        if part.unit_price < Decimal::ZERO {
            return Err(check_violation("inventory_unit_price_check"));
        }
        if part.quantity_in_stock < 0 {
            return Err(check_violation("inventory_quantity_in_stock_check"));
        }

        let created = Part {
            part_id: tables.next_id("inventory"),
            part_name: part.part_name.clone(),
            part_code: part.part_code.clone(),
            brand: part.brand.clone(),
            unit_price: part.unit_price,
            quantity_in_stock: part.quantity_in_stock,
            quantity_label: part.quantity_label.clone(),
            reorder_level: part.reorder_level,
            description: part.description.clone(),
            image_url: part.image_url.clone(),
            last_updated: Utc::now(),
        };
        tables.parts.insert(created.part_id, created.clone());
        Ok(created)
    }

    async fn update_part(&self, part_id: i32, changes: &PartChanges) -> AppResult<Option<Part>> {
        let mut tables = self.lock()?;

        let current = match tables.parts.get(&part_id) {
            Some(part) => part.clone(),
            None => return Ok(None),
        };
        if let Some(ref code) = changes.part_code {
            tables.ensure_part_code_free(code, Some(part_id))?;
        }

        let mut updated = changes.apply_to(&current);
        if updated.unit_price < Decimal::ZERO {
            return Err(check_violation("inventory_unit_price_check"));
        }
        if updated.quantity_in_stock < 0 {
            return Err(check_violation("inventory_quantity_in_stock_check"));
        }
        updated.last_updated = Utc::now();

        tables.parts.insert(part_id, updated.clone());
        Ok(Some(updated))
    }

    async fn decrement_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        self.lock()?.debit(part_id, quantity)
    }

    async fn increment_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        self.lock()?.credit(part_id, quantity)
    }

    async fn set_stock(&self, part_id: i32, quantity: i32) -> AppResult<Part> {
        let mut tables = self.lock()?;
        if quantity < 0 {
            return Err(check_violation("inventory_quantity_in_stock_check"));
        }
        let part = tables
            .parts
            .get_mut(&part_id)
            .ok_or_else(|| not_found_error("Part", part_id))?;
        part.quantity_in_stock = quantity;
        part.last_updated = Utc::now();
        Ok(part.clone())
    }

    async fn delete_part(&self, part_id: i32) -> AppResult<bool> {
        let mut tables = self.lock()?;
        if tables.usages.values().any(|u| u.part_id == part_id) {
            return Err(check_violation("job_parts_used_part_id_fkey"));
        }
        Ok(tables.parts.remove(&part_id).is_some())
    }
}

#[async_trait]
impl JobPartsRepository for MemoryStore {
    async fn list_usages_for_job(&self, job_id: i32) -> AppResult<Vec<PartUsageDetail>> {
        let tables = self.lock()?;
        let mut details: Vec<PartUsageDetail> = tables
            .usages
            .values()
            .filter(|u| u.job_id == job_id)
            .filter_map(|u| {
                tables.parts.get(&u.part_id).map(|p| PartUsageDetail {
                    usage: u.clone(),
                    part_name: p.part_name.clone(),
                    part_code: p.part_code.clone(),
                    brand: p.brand.clone(),
                })
            })
            .collect();
        details.sort_by(|a, b| {
            a.usage
                .used_at
                .cmp(&b.usage.used_at)
                .then(a.usage.usage_id.cmp(&b.usage.usage_id))
        });
        Ok(details)
    }

    async fn record_usage(
        &self,
        job_id: i32,
        part_id: i32,
        quantity: i32,
    ) -> AppResult<PartUsage> {
        let mut tables = self.lock()?;

        if !tables.jobs.contains_key(&job_id) {
            return Err(not_found_error("Service job", job_id));
        }
        if quantity <= 0 {
            return Err(check_violation("job_parts_used_quantity_used_check"));
        }
        let part = tables.debit(part_id, quantity)?;

        let usage = PartUsage {
            usage_id: tables.next_id("job_parts_used"),
            job_id,
            part_id,
            quantity_used: quantity,
            unit_price_at_time: part.unit_price,
            used_at: Utc::now(),
        };
        tables.usages.insert(usage.usage_id, usage.clone());
        Ok(usage)
    }

    async fn remove_usage(&self, usage_id: i32) -> AppResult<PartUsage> {
        let mut tables = self.lock()?;

        let usage = tables
            .usages
            .get(&usage_id)
            .cloned()
            .ok_or_else(|| not_found_error("Part usage", usage_id))?;
        tables.credit(usage.part_id, usage.quantity_used)?;
        tables.usages.remove(&usage_id);
        Ok(usage)
    }

    async fn total_parts_cost(&self, job_id: i32) -> AppResult<Decimal> {
        let tables = self.lock()?;
        Ok(total_cost(tables.usages.values().filter(|u| u.job_id == job_id)))
    }
}

#[async_trait]
impl ServiceJobRepository for MemoryStore {
    async fn create_job(
        &self,
        request_id: i32,
        employee_id: Option<i32>,
        labor_charge: Decimal,
    ) -> AppResult<ServiceJob> {
        let mut tables = self.lock()?;

        if !tables.requests.contains_key(&request_id) {
            return Err(check_violation("service_jobs_request_id_fkey"));
        }
        if let Some(employee_id) = employee_id {
            if !tables.employees.contains_key(&employee_id) {
                return Err(check_violation("service_jobs_employee_id_fkey"));
            }
        }
        if labor_charge < Decimal::ZERO {
            return Err(check_violation("service_jobs_labor_charge_check"));
        }

        let job = ServiceJob {
            job_id: tables.next_id("service_jobs"),
            request_id,
            employee_id,
            job_status: JobStatus::InProgress,
            labor_charge,
            start_time: Utc::now(),
            end_time: None,
        };
        tables.jobs.insert(job.job_id, job.clone());
        Ok(job)
    }

    async fn find_job(&self, job_id: i32) -> AppResult<Option<ServiceJob>> {
        Ok(self.lock()?.jobs.get(&job_id).cloned())
    }

    async fn list_jobs(&self, filter: JobFilter) -> AppResult<Vec<ServiceJob>> {
        let tables = self.lock()?;

        if filter.completed_without_bill {
            let mut jobs: Vec<ServiceJob> = tables
                .jobs
                .values()
                .filter(|j| j.is_completed())
                .filter(|j| !tables.bills.values().any(|b| b.job_id == j.job_id))
                .cloned()
                .collect();
            jobs.sort_by(|a, b| b.end_time.cmp(&a.end_time).then(b.job_id.cmp(&a.job_id)));
            return Ok(jobs);
        }

        let mut jobs: Vec<ServiceJob> = tables
            .jobs
            .values()
            .filter(|j| filter.status.map_or(true, |s| j.job_status == s))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.job_id.cmp(&a.job_id)));
        Ok(jobs)
    }

    async fn latest_job_for_request(&self, request_id: i32) -> AppResult<Option<ServiceJob>> {
        Ok(self
            .lock()?
            .jobs
            .values()
            .filter(|j| j.request_id == request_id)
            .max_by_key(|j| j.job_id)
            .cloned())
    }

    async fn active_job_for_vehicle(&self, vehicle_id: i32) -> AppResult<Option<ServiceJob>> {
        let tables = self.lock()?;
        Ok(tables
            .jobs
            .values()
            .filter(|j| j.job_status == JobStatus::InProgress)
            .filter(|j| {
                tables
                    .requests
                    .get(&j.request_id)
                    .map_or(false, |r| r.vehicle_id == vehicle_id)
            })
            .max_by_key(|j| (j.start_time, j.job_id))
            .cloned())
    }

    async fn assign_job_employee(
        &self,
        job_id: i32,
        employee_id: i32,
    ) -> AppResult<Option<ServiceJob>> {
        let mut tables = self.lock()?;
        if !tables.employees.contains_key(&employee_id) {
            return Err(check_violation("service_jobs_employee_id_fkey"));
        }
        Ok(tables.jobs.get_mut(&job_id).map(|job| {
            job.employee_id = Some(employee_id);
            job.clone()
        }))
    }

    async fn set_labor_charge(
        &self,
        job_id: i32,
        labor_charge: Decimal,
    ) -> AppResult<Option<ServiceJob>> {
        if labor_charge < Decimal::ZERO {
            return Err(check_violation("service_jobs_labor_charge_check"));
        }
        Ok(self.lock()?.jobs.get_mut(&job_id).map(|job| {
            job.labor_charge = labor_charge;
            job.clone()
        }))
    }

    async fn set_job_status(
        &self,
        job_id: i32,
        status: JobStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<Option<ServiceJob>> {
        if (status == JobStatus::Completed) != end_time.is_some() {
            return Err(check_violation("service_jobs_check"));
        }
        Ok(self.lock()?.jobs.get_mut(&job_id).map(|job| {
            job.job_status = status;
            job.end_time = end_time;
            job.clone()
        }))
    }
}

#[async_trait]
impl ServiceRequestRepository for MemoryStore {
    async fn create_request_with_job(
        &self,
        request: &NewServiceRequest,
    ) -> AppResult<(ServiceRequest, ServiceJob)> {
        let mut tables = self.lock()?;

        if !tables.vehicles.contains_key(&request.vehicle_id) {
            return Err(check_violation("service_requests_vehicle_id_fkey"));
        }
        if let Some(employee_id) = request.assigned_employee_id {
            if !tables.employees.contains_key(&employee_id) {
                return Err(check_violation("service_jobs_employee_id_fkey"));
            }
        }

        let now = Utc::now();
        let created = ServiceRequest {
            request_id: tables.next_id("service_requests"),
            vehicle_id: request.vehicle_id,
            service_type: request.service_type.clone(),
            problem_note: request.problem_note.clone(),
            priority: request.priority.clone(),
            status: request.status,
            request_date: now.date_naive(),
        };
        let job = ServiceJob {
            job_id: tables.next_id("service_jobs"),
            request_id: created.request_id,
            employee_id: request.assigned_employee_id,
            job_status: JobStatus::InProgress,
            labor_charge: Decimal::ZERO,
            start_time: now,
            end_time: None,
        };

        tables.requests.insert(created.request_id, created.clone());
        tables.jobs.insert(job.job_id, job.clone());
        Ok((created, job))
    }

    async fn find_request(&self, request_id: i32) -> AppResult<Option<ServiceRequest>> {
        Ok(self.lock()?.requests.get(&request_id).cloned())
    }

    async fn find_request_summary(
        &self,
        request_id: i32,
    ) -> AppResult<Option<ServiceRequestSummary>> {
        let tables = self.lock()?;
        Ok(tables.requests.get(&request_id).map(|r| tables.summary(r)))
    }

    async fn list_requests(&self, filter: &RequestFilter) -> AppResult<Vec<ServiceRequestSummary>> {
        let tables = self.lock()?;
        let mut summaries: Vec<ServiceRequestSummary> = tables
            .requests
            .values()
            .map(|r| tables.summary(r))
            .filter(|s| filter.status.map_or(true, |status| s.request.status == status))
            .filter(|s| filter.search.as_deref().map_or(true, |term| s.matches_search(term)))
            .filter(|s| filter.customer_id.map_or(true, |id| s.customer_id == Some(id)))
            .filter(|s| filter.vehicle_id.map_or(true, |id| s.request.vehicle_id == id))
            .collect();
        summaries.sort_by(|a, b| {
            b.request
                .request_date
                .cmp(&a.request.request_date)
                .then(b.request.request_id.cmp(&a.request.request_id))
        });
        Ok(summaries)
    }

    async fn update_request(
        &self,
        request_id: i32,
        changes: &RequestChanges,
    ) -> AppResult<Option<ServiceRequest>> {
        let mut tables = self.lock()?;

        if let Some(vehicle_id) = changes.vehicle_id {
            if !tables.vehicles.contains_key(&vehicle_id) {
                return Err(check_violation("service_requests_vehicle_id_fkey"));
            }
        }
        Ok(tables.requests.get_mut(&request_id).map(|request| {
            *request = changes.apply_to(request);
            request.clone()
        }))
    }

    async fn set_request_status(
        &self,
        request_id: i32,
        status: RequestStatus,
    ) -> AppResult<Option<ServiceRequest>> {
        Ok(self.lock()?.requests.get_mut(&request_id).map(|request| {
            request.status = status;
            request.clone()
        }))
    }

    async fn delete_request(&self, request_id: i32) -> AppResult<bool> {
        let mut tables = self.lock()?;
        if !tables.requests.contains_key(&request_id) {
            return Ok(false);
        }
        if tables.jobs.values().any(|j| j.request_id == request_id) {
            return Err(AppError::HasDependentJobs { request_id });
        }
        tables.requests.remove(&request_id);
        Ok(true)
    }
}

#[async_trait]
impl BillingRepository for MemoryStore {
    async fn list_bills(&self) -> AppResult<Vec<BillView>> {
        let tables = self.lock()?;
        let mut views: Vec<BillView> = tables
            .bills
            .values()
            .filter_map(|bill| tables.bill_view(bill))
            .collect();
        views.sort_by(|a, b| {
            b.bill
                .bill_date
                .cmp(&a.bill.bill_date)
                .then(b.bill.bill_id.cmp(&a.bill.bill_id))
        });
        Ok(views)
    }

    async fn find_bill(&self, bill_id: i32) -> AppResult<Option<Bill>> {
        Ok(self.lock()?.bills.get(&bill_id).cloned())
    }

    async fn find_bill_by_job(&self, job_id: i32) -> AppResult<Option<Bill>> {
        Ok(self
            .lock()?
            .bills
            .values()
            .find(|b| b.job_id == job_id)
            .cloned())
    }

    async fn find_bill_view(&self, bill_id: i32) -> AppResult<Option<BillView>> {
        let tables = self.lock()?;
        Ok(tables.bills.get(&bill_id).and_then(|bill| tables.bill_view(bill)))
    }

    async fn find_bill_view_by_job(&self, job_id: i32) -> AppResult<Option<BillView>> {
        let tables = self.lock()?;
        Ok(tables
            .bills
            .values()
            .find(|b| b.job_id == job_id)
            .and_then(|bill| tables.bill_view(bill)))
    }

    async fn insert_bill(&self, bill: &NewBill) -> AppResult<Bill> {
        let mut tables = self.lock()?;

        if !tables.jobs.contains_key(&bill.job_id) {
            return Err(check_violation("billing_job_id_fkey"));
        }
        if tables.bills.values().any(|b| b.job_id == bill.job_id) {
            return Err(AppError::AlreadyBilled { job_id: bill.job_id });
        }

        let created = Bill {
            bill_id: tables.next_id("billing"),
            job_id: bill.job_id,
            subtotal_labor: bill.amounts.subtotal_labor,
            subtotal_parts: bill.amounts.subtotal_parts,
            tax: bill.amounts.tax,
            total_amount: bill.amounts.total_amount,
            payment_status: PaymentStatus::Unpaid,
            bill_date: bill.bill_date,
            payment_date: None,
        };
        tables.bills.insert(created.bill_id, created.clone());
        Ok(created)
    }

    async fn mark_bill_paid(
        &self,
        bill_id: i32,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Option<Bill>> {
        Ok(self.lock()?.bills.get_mut(&bill_id).map(|bill| {
            bill.payment_status = PaymentStatus::Paid;
            bill.payment_date = Some(paid_at);
            bill.clone()
        }))
    }

    async fn update_bill_amounts(
        &self,
        bill_id: i32,
        amounts: &BillAmounts,
    ) -> AppResult<Option<Bill>> {
        Ok(self.lock()?.bills.get_mut(&bill_id).map(|bill| {
            bill.subtotal_labor = amounts.subtotal_labor;
            bill.subtotal_parts = amounts.subtotal_parts;
            bill.tax = amounts.tax;
            bill.total_amount = amounts.total_amount;
            bill.clone()
        }))
    }
}

#[async_trait]
impl DashboardRepository for MemoryStore {
    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let tables = self.lock()?;
        let billed = |status: PaymentStatus| -> Decimal {
            tables
                .bills
                .values()
                .filter(|b| b.payment_status == status)
                .map(|b| b.total_amount)
                .sum()
        };
        let count = |n: usize| n as i64;

        Ok(DashboardStats {
            customers_count: count(tables.customers.len()),
            vehicles_count: count(tables.vehicles.len()),
            pending_requests: count(
                tables
                    .requests
                    .values()
                    .filter(|r| r.status == RequestStatus::Pending)
                    .count(),
            ),
            active_jobs: count(
                tables
                    .jobs
                    .values()
                    .filter(|j| j.job_status == JobStatus::InProgress)
                    .count(),
            ),
            low_stock_items: count(tables.parts.values().filter(|p| p.is_low_stock()).count()),
            unpaid_total: billed(PaymentStatus::Unpaid),
            total_revenue: billed(PaymentStatus::Paid),
        })
    }
}
