use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::dto::service_job_dto::{
    AssignEmployeeRequest, CreateJobRequest, JobListQuery, UpdateJobStatusRequest,
    UpdateLaborChargeRequest,
};
use crate::dto::ApiResponse;
use crate::models::ServiceJob;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_job_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/:id", get(get_job))
        .route("/:id/assign", put(assign_employee))
        .route("/:id/status", put(update_status))
        .route("/:id/labor-charge", put(update_labor_charge))
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<ServiceJob>>, AppError> {
    Ok(Json(state.service_jobs().list(query).await?))
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceJob>>), AppError> {
    let job = state.service_jobs().create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(job, "Service job created")),
    ))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ServiceJob>, AppError> {
    Ok(Json(state.service_jobs().get(id).await?))
}

async fn assign_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AssignEmployeeRequest>,
) -> Result<Json<ApiResponse<ServiceJob>>, AppError> {
    let job = state
        .service_jobs()
        .assign_employee(id, request.employee_id)
        .await?;
    Ok(Json(ApiResponse::success_with_message(job, "Employee assigned")))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateJobStatusRequest>,
) -> Result<Json<ApiResponse<ServiceJob>>, AppError> {
    let job = state.service_jobs().update_status(id, &request.status).await?;
    Ok(Json(ApiResponse::success_with_message(job, "Job status updated")))
}

async fn update_labor_charge(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLaborChargeRequest>,
) -> Result<Json<ApiResponse<ServiceJob>>, AppError> {
    let job = state
        .service_jobs()
        .update_labor_charge(id, request.labor_charge)
        .await?;
    Ok(Json(ApiResponse::success_with_message(job, "Labor charge updated")))
}
