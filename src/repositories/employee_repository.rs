use async_trait::async_trait;

use super::postgres::{map_db_error, PgStore};
use crate::models::{Employee, NewEmployee};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee>;
    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>>;
    /// Empleados distintos asignados a los trabajos de una solicitud
    async fn employees_for_request(&self, request_id: i32) -> AppResult<Vec<Employee>>;
}

#[async_trait]
impl EmployeeRepository for PgStore {
    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, position, phone) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(&employee.phone)
        .fetch_one(self.pool())
        .await
        .map_err(map_db_error)
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_db_error)
    }

    async fn employees_for_request(&self, request_id: i32) -> AppResult<Vec<Employee>> {
        log::debug!("SELECT employees for request_id={}", request_id);

        sqlx::query_as::<_, Employee>(
            r#"
            SELECT DISTINCT e.employee_id, e.name, e.position, e.phone
            FROM employees e
            JOIN service_jobs j ON j.employee_id = e.employee_id
            WHERE j.request_id = $1
            ORDER BY e.employee_id
            "#,
        )
        .bind(request_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_db_error)
    }
}
