use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::billing_dto::{GenerateBillRequest, UpdateBillAmountsRequest};
use crate::dto::ApiResponse;
use crate::models::{Bill, BillDetail, BillView};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_billing_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bills))
        .route("/generate", post(generate_bill))
        .route("/job/:job_id", get(get_bill_by_job))
        .route("/:id", get(get_bill).put(update_amounts))
        .route("/:id/pay", put(mark_paid))
}

async fn list_bills(State(state): State<AppState>) -> Result<Json<Vec<BillView>>, AppError> {
    Ok(Json(state.billing().list().await?))
}

async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BillView>, AppError> {
    Ok(Json(state.billing().get(id).await?))
}

async fn get_bill_by_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<BillDetail>, AppError> {
    Ok(Json(state.billing().get_by_job(job_id).await?))
}

async fn generate_bill(
    State(state): State<AppState>,
    Json(request): Json<GenerateBillRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Bill>>), AppError> {
    let bill = state
        .billing()
        .generate(request.job_id, request.tax_rate)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(bill, "Bill generated")),
    ))
}

async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Bill>>, AppError> {
    let bill = state.billing().mark_paid(id).await?;
    Ok(Json(ApiResponse::success_with_message(bill, "Bill marked as paid")))
}

async fn update_amounts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBillAmountsRequest>,
) -> Result<Json<ApiResponse<Bill>>, AppError> {
    let bill = state.billing().update_amounts(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(bill, "Bill amounts updated")))
}
