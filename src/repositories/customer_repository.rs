use async_trait::async_trait;

use super::postgres::{map_db_error, PgStore};
use crate::models::{Customer, NewCustomer};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Teléfono y email duplicados devuelven `DuplicateKey`
    async fn create_customer(&self, customer: &NewCustomer) -> AppResult<Customer>;
    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>>;
    /// Los más recientes primero
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;
}

#[async_trait]
impl CustomerRepository for PgStore {
    async fn create_customer(&self, customer: &NewCustomer) -> AppResult<Customer> {
        log::debug!("INSERT customer phone={}", customer.phone);

        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers ORDER BY created_at DESC, customer_id DESC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }
}
