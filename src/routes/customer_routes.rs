use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::customer_dto::{CreateCustomerRequest, CreateEmployeeRequest, CreateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::{Customer, Employee, Vehicle, VehicleWithOwner};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer))
}

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle))
        .route("/by-plate/:plate_no", get(get_vehicle_by_plate))
}

pub fn create_employee_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_employee))
        .route("/:id", get(get_employee))
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers().list_customers().await?))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), AppError> {
    let customer = state.customers().create_customer(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(customer, "Customer created")),
    ))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers().get_customer(id).await?))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleWithOwner>>, AppError> {
    Ok(Json(state.customers().list_vehicles().await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let vehicle = state.customers().create_vehicle(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(vehicle, "Vehicle registered")),
    ))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(state.customers().get_vehicle(id).await?))
}

async fn get_vehicle_by_plate(
    State(state): State<AppState>,
    Path(plate_no): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    Ok(Json(state.customers().find_vehicle_by_plate(&plate_no).await?))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Employee>>), AppError> {
    let employee = state.customers().create_employee(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(employee, "Employee created")),
    ))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(state.customers().get_employee(id).await?))
}
