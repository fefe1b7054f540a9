//! Motor de facturación
//!
//! Una factura por trabajo: mano de obra + artículos + impuesto. El total
//! nunca se fija directamente, siempre se recalcula.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::dto::billing_dto::UpdateBillAmountsRequest;
use crate::models::{AmountChanges, Bill, BillAmounts, BillDetail, BillView, NewBill};
use crate::repositories::{BillingRepository, JobPartsRepository, ServiceJobRepository, Store};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{validate_amount, validate_tax_rate};

pub struct BillingController {
    store: Arc<dyn Store>,
    default_tax_rate: Decimal,
}

impl BillingController {
    pub fn new(store: Arc<dyn Store>, default_tax_rate: Decimal) -> Self {
        Self {
            store,
            default_tax_rate,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<BillView>> {
        self.store.list_bills().await
    }

    pub async fn get(&self, bill_id: i32) -> AppResult<BillView> {
        self.store
            .find_bill_view(bill_id)
            .await?
            .ok_or_else(|| not_found_error("Bill", bill_id))
    }

    /// Factura del trabajo con el desglose de artículos consumidos
    pub async fn get_by_job(&self, job_id: i32) -> AppResult<BillDetail> {
        let view = self
            .store
            .find_bill_view_by_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bill for job '{}' not found", job_id)))?;
        let parts_used = self.store.list_usages_for_job(job_id).await?;
        Ok(BillDetail { view, parts_used })
    }

    /// `AlreadyBilled` si el trabajo ya tiene factura; la restricción única
    /// de la tabla resuelve las carreras entre dos llamadas simultáneas
    pub async fn generate(&self, job_id: i32, tax_rate: Option<Decimal>) -> AppResult<Bill> {
        let tax_rate = tax_rate.unwrap_or(self.default_tax_rate);
        validate_tax_rate(tax_rate)?;

        if self.store.find_bill_by_job(job_id).await?.is_some() {
            return Err(AppError::AlreadyBilled { job_id });
        }
        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| not_found_error("Service job", job_id))?;

        let subtotal_parts = self.store.total_parts_cost(job_id).await?;
        let amounts = BillAmounts::compute(job.labor_charge, subtotal_parts, tax_rate)?;

        let bill = self
            .store
            .insert_bill(&NewBill {
                job_id,
                amounts,
                bill_date: Utc::now(),
            })
            .await?;

        tracing::info!(
            bill_id = bill.bill_id,
            job_id,
            total = %bill.total_amount,
            "🧾 Bill generated"
        );
        Ok(bill)
    }

    /// Repetir la llamada sólo vuelve a sellar `payment_date`
    pub async fn mark_paid(&self, bill_id: i32) -> AppResult<Bill> {
        let bill = self
            .store
            .mark_bill_paid(bill_id, Utc::now())
            .await?
            .ok_or_else(|| not_found_error("Bill", bill_id))?;
        tracing::info!(bill_id, "💰 Bill marked as paid");
        Ok(bill)
    }

    pub async fn update_amounts(
        &self,
        bill_id: i32,
        request: UpdateBillAmountsRequest,
    ) -> AppResult<Bill> {
        let changes = AmountChanges::from(request);
        for (field, value) in [
            ("subtotal_labor", changes.subtotal_labor),
            ("subtotal_parts", changes.subtotal_parts),
            ("tax", changes.tax),
        ] {
            if let Some(value) = value {
                validate_amount(field, value)?;
            }
        }

        let current = self
            .store
            .find_bill(bill_id)
            .await?
            .ok_or_else(|| not_found_error("Bill", bill_id))?;
        let amounts = current.amounts().with_changes(&changes)?;

        self.store
            .update_bill_amounts(bill_id, &amounts)
            .await?
            .ok_or_else(|| not_found_error("Bill", bill_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        NewCustomer, NewPart, NewServiceRequest, NewVehicle, RequestStatus, ServiceJob,
    };
    use crate::repositories::{
        CustomerRepository, InventoryRepository, MemoryStore, ServiceRequestRepository,
        VehicleRepository,
    };

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    async fn billed_job_fixture() -> (Arc<MemoryStore>, ServiceJob) {
        let store = Arc::new(MemoryStore::new());
        let customer = store
            .create_customer(&NewCustomer {
                name: "Marta".to_string(),
                phone: "555-0200".to_string(),
                email: None,
                address: None,
            })
            .await
            .unwrap();
        let vehicle = store
            .create_vehicle(&NewVehicle {
                customer_id: customer.customer_id,
                plate_no: "MT-200".to_string(),
                brand: "Seat".to_string(),
                model: "Ibiza".to_string(),
                year: Some(2018),
                color: None,
            })
            .await
            .unwrap();
        let (_, job) = store
            .create_request_with_job(&NewServiceRequest {
                vehicle_id: vehicle.vehicle_id,
                service_type: "Brake Service".to_string(),
                problem_note: None,
                priority: "Normal".to_string(),
                status: RequestStatus::Pending,
                assigned_employee_id: None,
            })
            .await
            .unwrap();
        let part = store
            .insert_part(&NewPart {
                part_name: "Brake Pads".to_string(),
                part_code: "BP-200".to_string(),
                brand: None,
                unit_price: dec("45.00"),
                quantity_in_stock: 10,
                quantity_label: "pcs".to_string(),
                reorder_level: 2,
                description: None,
                image_url: None,
            })
            .await
            .unwrap();
        store.record_usage(job.job_id, part.part_id, 2).await.unwrap();
        store.set_labor_charge(job.job_id, dec("100")).await.unwrap();
        (store, job)
    }

    #[tokio::test]
    async fn test_generate_uses_labor_parts_and_tax() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);

        let bill = billing.generate(job.job_id, None).await.unwrap();
        assert_eq!(bill.subtotal_labor, dec("100"));
        assert_eq!(bill.subtotal_parts, dec("90.00"));
        assert_eq!(bill.tax, dec("34.20"));
        assert_eq!(bill.total_amount, dec("224.20"));
        assert!(!bill.is_paid());
    }

    #[tokio::test]
    async fn test_second_generate_is_already_billed() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);

        billing.generate(job.job_id, Some(Decimal::ZERO)).await.unwrap();
        let err = billing.generate(job.job_id, None).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyBilled { job_id } if job_id == job.job_id));
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_tax_rate() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);

        let err = billing.generate(job.job_id, Some(dec("-0.1"))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_generate_for_unknown_job_is_not_found() {
        let billing = BillingController::new(Arc::new(MemoryStore::new()), dec("0.18"));
        let err = billing.generate(404, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_amounts_recomputes_total() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);
        let bill = billing.generate(job.job_id, None).await.unwrap();

        let updated = billing
            .update_amounts(
                bill.bill_id,
                UpdateBillAmountsRequest {
                    tax: Some(dec("10")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_amount, dec("200.00"));

        let err = billing
            .update_amounts(
                bill.bill_id,
                UpdateBillAmountsRequest {
                    subtotal_labor: Some(dec("-1")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_update_amounts_rejects_out_of_range_values() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);
        let bill = billing.generate(job.job_id, None).await.unwrap();

        for request in [
            UpdateBillAmountsRequest {
                subtotal_labor: Some(Decimal::MAX),
                ..Default::default()
            },
            UpdateBillAmountsRequest {
                tax: Some(dec("1.005")),
                ..Default::default()
            },
            // cada importe cabe en su columna, el total no
            UpdateBillAmountsRequest {
                subtotal_labor: Some(crate::models::MAX_AMOUNT),
                subtotal_parts: Some(crate::models::MAX_AMOUNT),
                tax: None,
            },
        ] {
            let err = billing.update_amounts(bill.bill_id, request).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }

        let unchanged = billing.get(bill.bill_id).await.unwrap();
        assert_eq!(unchanged.bill.total_amount, dec("224.20"));
    }

    #[tokio::test]
    async fn test_get_by_job_lists_parts_used() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);
        billing.generate(job.job_id, None).await.unwrap();

        let detail = billing.get_by_job(job.job_id).await.unwrap();
        assert_eq!(detail.parts_used.len(), 1);
        assert_eq!(detail.parts_used[0].part_code, "BP-200");
        assert_eq!(detail.view.plate_no, "MT-200");
    }

    #[tokio::test]
    async fn test_bill_views_carry_job_and_customer_context() {
        let (store, job) = billed_job_fixture().await;
        let billing = BillingController::new(store, crate::models::DEFAULT_TAX_RATE);
        let bill = billing.generate(job.job_id, None).await.unwrap();

        let view = billing.get(bill.bill_id).await.unwrap();
        assert_eq!(view.bill.bill_id, bill.bill_id);
        assert_eq!(view.job_status, crate::models::JobStatus::InProgress);
        assert_eq!(view.labor_charge, dec("100"));
        assert_eq!(view.service_type, "Brake Service");
        assert_eq!(view.plate_no, "MT-200");
        assert_eq!(view.brand, "Seat");
        assert_eq!(view.year, Some(2018));
        assert_eq!(view.customer_name, "Marta");
        assert_eq!(view.customer_phone, "555-0200");
        assert!(view.customer_email.is_none());

        let listed = billing.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name, "Marta");

        assert!(matches!(billing.get(404).await, Err(AppError::NotFound(_))));
    }
}
