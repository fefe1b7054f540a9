use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use vehicle_service::config::EnvironmentConfig;
use vehicle_service::repositories::MemoryStore;
use vehicle_service::{create_app, AppState};

fn create_test_app() -> Router {
    create_app(AppState::new(
        Arc::new(MemoryStore::new()),
        EnvironmentConfig::default(),
    ))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Cliente + vehículo + solicitud por la ruta de recepción
async fn intake(app: &Router, phone: &str, plate_no: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/service-requests/intake",
        Some(json!({
            "customer": { "name": "Jane Doe", "phone": phone },
            "vehicle": { "plate_no": plate_no, "brand": "Toyota", "model": "Corolla" },
            "service_type": "Oil Change"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vehicle-service");
}

#[tokio::test]
async fn test_intake_then_complete_generates_bill() {
    let app = create_test_app();
    let created = intake(&app, "555-2000", "AB-123").await;
    let request_id = created["request"]["request_id"].as_i64().unwrap();
    let job_id = created["job"]["job_id"].as_i64().unwrap();
    assert_eq!(created["request"]["status"], "Pending");
    assert_eq!(created["job"]["job_status"], "In Progress");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/service-requests/{}/status", request_id),
        Some(json!({ "status": "Completed", "labor_charge": "500" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["job"]["job_status"], "Completed");
    assert!(body["data"]["bill"].is_object());

    let (status, bill) = send(&app, Method::GET, &format!("/api/billing/job/{}", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let total: Decimal = bill["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, Decimal::from(590));
    assert_eq!(bill["payment_status"], "Unpaid");
    assert!(bill["parts_used"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_generate_is_conflict() {
    let app = create_test_app();
    let created = intake(&app, "555-2001", "AB-124").await;
    let job_id = created["job"]["job_id"].clone();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/billing/generate",
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/billing/generate",
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_BILLED");
}

#[tokio::test]
async fn test_insufficient_stock_is_bad_request() {
    let app = create_test_app();
    let created = intake(&app, "555-2002", "AB-125").await;
    let job_id = created["job"]["job_id"].clone();

    let (status, part) = send(
        &app,
        Method::POST,
        "/api/inventory",
        Some(json!({
            "part_name": "Spark Plug",
            "part_code": "SP-01",
            "unit_price": "4.50",
            "quantity_in_stock": 2,
            "reorder_level": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let part_id = part["data"]["part_id"].clone();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/job-parts",
        Some(json!({ "job_id": job_id, "part_id": part_id, "quantity_used": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["details"]["available"], 2);

    let (_, part) = send(&app, Method::GET, &format!("/api/inventory/{}", part_id), None).await;
    assert_eq!(part["quantity_in_stock"], 2);
    assert_eq!(part["low_stock"], false);
}

#[tokio::test]
async fn test_low_stock_listing_and_stock_modes() {
    let app = create_test_app();
    let (_, part) = send(
        &app,
        Method::POST,
        "/api/inventory",
        Some(json!({
            "part_name": "Wiper Blade",
            "part_code": "WB-01",
            "unit_price": "12.00",
            "quantity_in_stock": 10,
            "reorder_level": 3
        })),
    )
    .await;
    let part_id = part["data"]["part_id"].clone();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/inventory/{}/stock", part_id),
        Some(json!({ "quantity": -8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, low) = send(&app, Method::GET, "/api/inventory/low-stock", None).await;
    assert_eq!(low.as_array().unwrap().len(), 1);
    assert_eq!(low[0]["part_code"], "WB-01");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/inventory/{}/stock", part_id),
        Some(json!({ "quantity": 20, "mode": "absolute" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity_in_stock"], 20);
}

#[tokio::test]
async fn test_ownership_mismatch_is_conflict() {
    let app = create_test_app();
    intake(&app, "555-2003", "OWN-1").await;
    let other = intake(&app, "555-2004", "OTH-1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/job-parts/by-plate",
        Some(json!({
            "plate_no": "OWN-1",
            "customer_id": other["customer"]["customer_id"],
            "part_id": 1,
            "quantity_used": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OWNERSHIP_MISMATCH");
}

#[tokio::test]
async fn test_unknown_entities_are_not_found() {
    let app = create_test_app();
    for uri in [
        "/api/customers/41",
        "/api/vehicles/41",
        "/api/service-requests/41",
        "/api/service-jobs/41",
        "/api/billing/41",
        "/api/inventory/41",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_invalid_status_value_is_bad_request() {
    let app = create_test_app();
    let created = intake(&app, "555-2005", "AB-126").await;
    let request_id = created["request"]["request_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/service-requests/{}/status", request_id),
        Some(json!({ "status": "Finished" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_request_listing_filters_by_search() {
    let app = create_test_app();
    intake(&app, "555-2006", "SRCH-1").await;
    intake(&app, "555-2007", "OTHER-2").await;

    let (status, body) = send(&app, Method::GET, "/api/service-requests?search=srch", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["plate_no"], "SRCH-1");
}

#[tokio::test]
async fn test_dashboard_and_listings() {
    let app = create_test_app();
    let created = intake(&app, "555-2008", "DSH-1").await;
    intake(&app, "555-2009", "DSH-2").await;
    let request_id = created["request"]["request_id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/service-requests/{}/status", request_id),
        Some(json!({ "status": "Completed", "labor_charge": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["customers_count"], 2);
    assert_eq!(stats["vehicles_count"], 2);
    assert_eq!(stats["pending_requests"], 1);
    assert_eq!(stats["active_jobs"], 1);
    let unpaid: Decimal = stats["unpaid_total"].as_str().unwrap().parse().unwrap();
    assert_eq!(unpaid, Decimal::from(118));

    let (status, customers) = send(&app, Method::GET, "/api/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customers.as_array().unwrap().len(), 2);

    let (status, vehicles) = send(&app, Method::GET, "/api/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicles[0]["plate_no"], "DSH-2");
    assert_eq!(vehicles[1]["customer_phone"], "555-2008");

    let (status, bills) = send(&app, Method::GET, "/api/billing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bills[0]["plate_no"], "DSH-1");
    assert_eq!(bills[0]["customer_name"], "Jane Doe");
    assert_eq!(bills[0]["job_status"], "Completed");
    assert_eq!(bills[0]["service_type"], "Oil Change");
}

#[tokio::test]
async fn test_out_of_range_price_is_rejected() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/inventory",
        Some(json!({
            "part_name": "Gold Plated Filter",
            "part_code": "GP-01",
            "unit_price": "123456789012.345",
            "quantity_in_stock": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (_, parts) = send(&app, Method::GET, "/api/inventory", None).await;
    assert!(parts.as_array().unwrap().is_empty());
}
