use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::service_request_dto::{
    CreateServiceRequestRequest, GetRequestQuery, IntakeCreated, IntakeRequest, RequestListQuery,
    ServiceRequestCreated, ServiceRequestDetail, UpdateRequestStatusRequest,
    UpdateServiceRequestRequest,
};
use crate::dto::ApiResponse;
use crate::models::ServiceRequestSummary;
use crate::services::WorkflowOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_request_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/intake", post(create_with_intake))
        .route(
            "/:id",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/:id/status", put(update_status))
}

async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<ServiceRequestSummary>>, AppError> {
    Ok(Json(state.service_requests().list(query).await?))
}

async fn create_request(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequestRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceRequestCreated>>), AppError> {
    let created = state.service_requests().create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            created,
            "Service request created with its job",
        )),
    ))
}

async fn create_with_intake(
    State(state): State<AppState>,
    Json(request): Json<IntakeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IntakeCreated>>), AppError> {
    let created = state.service_requests().create_with_intake(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            created,
            "Customer, vehicle and service request created",
        )),
    ))
}

async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<GetRequestQuery>,
) -> Result<Json<ServiceRequestDetail>, AppError> {
    Ok(Json(
        state
            .service_requests()
            .get(id, query.include_employees)
            .await?,
    ))
}

async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateServiceRequestRequest>,
) -> Result<Json<ApiResponse<WorkflowOutcome>>, AppError> {
    let outcome = state.service_requests().update(id, request).await?;
    let message = outcome_message(&outcome, "Service request updated");
    Ok(Json(ApiResponse::success_with_message(outcome, message)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRequestStatusRequest>,
) -> Result<Json<ApiResponse<WorkflowOutcome>>, AppError> {
    let outcome = state.service_requests().update_status(id, request).await?;
    let message = outcome_message(&outcome, "Status updated");
    Ok(Json(ApiResponse::success_with_message(outcome, message)))
}

async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.service_requests().delete(id).await?;
    Ok(Json(ApiResponse::message("Service request deleted")))
}

fn outcome_message(outcome: &WorkflowOutcome, base: &str) -> String {
    match (&outcome.bill, &outcome.billing_error) {
        (Some(_), _) => format!("{} and bill generated", base),
        (None, Some(failure)) => format!("{}; billing failed: {}", base, failure.message),
        (None, None) => base.to_string(),
    }
}
