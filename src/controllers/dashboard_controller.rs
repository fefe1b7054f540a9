//! Panel de control: contadores del taller y totales facturados

use std::sync::Arc;

use crate::models::DashboardStats;
use crate::repositories::{DashboardRepository, Store};
use crate::utils::errors::AppResult;

pub struct DashboardController {
    store: Arc<dyn Store>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let stats = self.store.dashboard_stats().await?;
        tracing::debug!(
            pending_requests = stats.pending_requests,
            active_jobs = stats.active_jobs,
            "📊 Dashboard stats computed"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BillAmounts, NewBill, NewCustomer, NewPart, NewServiceRequest, NewVehicle, RequestStatus,
    };
    use crate::repositories::{
        BillingRepository, CustomerRepository, InventoryRepository, MemoryStore,
        ServiceJobRepository, ServiceRequestRepository, VehicleRepository,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn test_empty_shop_has_zero_stats() {
        let dashboard = DashboardController::new(Arc::new(MemoryStore::new()));
        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.customers_count, 0);
        assert_eq!(stats.unpaid_total, Decimal::ZERO);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_stats_count_open_work_and_split_billing() {
        let store = Arc::new(MemoryStore::new());
        let customer = store
            .create_customer(&NewCustomer {
                name: "Iker".to_string(),
                phone: "555-0300".to_string(),
                email: None,
                address: None,
            })
            .await
            .unwrap();
        let vehicle = store
            .create_vehicle(&NewVehicle {
                customer_id: customer.customer_id,
                plate_no: "IK-300".to_string(),
                brand: "Renault".to_string(),
                model: "Clio".to_string(),
                year: None,
                color: None,
            })
            .await
            .unwrap();

        let mut jobs = Vec::new();
        for status in [RequestStatus::Pending, RequestStatus::Pending, RequestStatus::InProgress] {
            let (_, job) = store
                .create_request_with_job(&NewServiceRequest {
                    vehicle_id: vehicle.vehicle_id,
                    service_type: "Inspection".to_string(),
                    problem_note: None,
                    priority: "Normal".to_string(),
                    status,
                    assigned_employee_id: None,
                })
                .await
                .unwrap();
            jobs.push(job.job_id);
        }

        for (job_id, labor) in [(jobs[0], "100"), (jobs[1], "50.50")] {
            store
                .set_job_status(job_id, crate::models::JobStatus::Completed, Some(Utc::now()))
                .await
                .unwrap();
            store
                .insert_bill(&NewBill {
                    job_id,
                    amounts: BillAmounts::compute(dec(labor), Decimal::ZERO, Decimal::ZERO)
                        .unwrap(),
                    bill_date: Utc::now(),
                })
                .await
                .unwrap();
        }
        let paid = store.find_bill_by_job(jobs[0]).await.unwrap().unwrap();
        store.mark_bill_paid(paid.bill_id, Utc::now()).await.unwrap();

        for (code, stock) in [("LS-1", 1), ("OK-1", 20)] {
            store
                .insert_part(&NewPart {
                    part_name: format!("Part {}", code),
                    part_code: code.to_string(),
                    brand: None,
                    unit_price: dec("3.00"),
                    quantity_in_stock: stock,
                    quantity_label: "pcs".to_string(),
                    reorder_level: 5,
                    description: None,
                    image_url: None,
                })
                .await
                .unwrap();
        }

        let stats = DashboardController::new(store).stats().await.unwrap();
        assert_eq!(stats.customers_count, 1);
        assert_eq!(stats.vehicles_count, 1);
        assert_eq!(stats.pending_requests, 2);
        assert_eq!(stats.active_jobs, 1);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.unpaid_total, dec("50.50"));
        assert_eq!(stats.total_revenue, dec("100"));
    }
}
