use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::dto::inventory_dto::{CreatePartRequest, PartResponse, UpdatePartRequest, UpdateStockRequest};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(add_part))
        .route("/low-stock", get(list_low_stock))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/:id/stock", patch(update_stock))
}

async fn list_parts(State(state): State<AppState>) -> Result<Json<Vec<PartResponse>>, AppError> {
    Ok(Json(state.inventory().list().await?))
}

async fn list_low_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<PartResponse>>, AppError> {
    Ok(Json(state.inventory().list_low_stock().await?))
}

async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PartResponse>, AppError> {
    Ok(Json(state.inventory().get(id).await?))
}

async fn add_part(
    State(state): State<AppState>,
    Json(request): Json<CreatePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartResponse>>), AppError> {
    let part = state.inventory().add(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(part, "Part added to inventory")),
    ))
}

async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, AppError> {
    let part = state.inventory().update_fields(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(part, "Part updated")))
}

async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStockRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, AppError> {
    let part = state.inventory().update_stock(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(part, "Stock updated")))
}

async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.inventory().delete(id).await?;
    Ok(Json(ApiResponse::message("Part deleted")))
}
