//! Rutas HTTP
//!
//! Routers finos por componente montados bajo `/api`.

pub mod billing_routes;
pub mod customer_routes;
pub mod dashboard_routes;
pub mod inventory_routes;
pub mod job_parts_routes;
pub mod service_job_routes;
pub mod service_request_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Router completo de la API con su estado
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/customers", customer_routes::create_customer_router())
        .nest("/api/vehicles", customer_routes::create_vehicle_router())
        .nest("/api/employees", customer_routes::create_employee_router())
        .nest("/api/inventory", inventory_routes::create_inventory_router())
        .nest("/api/job-parts", job_parts_routes::create_job_parts_router())
        .nest("/api/service-jobs", service_job_routes::create_service_job_router())
        .nest(
            "/api/service-requests",
            service_request_routes::create_service_request_router(),
        )
        .nest("/api/billing", billing_routes::create_billing_router())
        .nest("/api/dashboard", dashboard_routes::create_dashboard_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "vehicle-service",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
