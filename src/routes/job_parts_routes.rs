use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::dto::job_parts_dto::{AddPartUsageByPlateRequest, AddPartUsageRequest, TotalCostResponse};
use crate::dto::ApiResponse;
use crate::models::{PartUsage, PartUsageDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_parts_router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_usage))
        .route("/by-plate", post(add_usage_by_plate))
        .route("/job/:job_id", get(list_for_job))
        .route("/job/:job_id/total", get(total_cost))
        .route("/:usage_id", delete(remove_usage))
}

async fn list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<Vec<PartUsageDetail>>, AppError> {
    Ok(Json(state.job_parts().list_for_job(job_id).await?))
}

async fn add_usage(
    State(state): State<AppState>,
    Json(request): Json<AddPartUsageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartUsageDetail>>), AppError> {
    let usage = state.job_parts().add_usage(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(usage, "Part added to job")),
    ))
}

async fn add_usage_by_plate(
    State(state): State<AppState>,
    Json(request): Json<AddPartUsageByPlateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartUsageDetail>>), AppError> {
    let usage = state.job_parts().add_usage_by_plate(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(usage, "Part added to active job")),
    ))
}

async fn remove_usage(
    State(state): State<AppState>,
    Path(usage_id): Path<i32>,
) -> Result<Json<ApiResponse<PartUsage>>, AppError> {
    let usage = state.job_parts().remove_usage(usage_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        usage,
        "Part removed from job, stock restored",
    )))
}

async fn total_cost(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<TotalCostResponse>, AppError> {
    let total_cost = state.job_parts().total_cost(job_id).await?;
    Ok(Json(TotalCostResponse { job_id, total_cost }))
}
