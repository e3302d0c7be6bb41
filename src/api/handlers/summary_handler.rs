//! Financial summary handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};

use domain::SummaryItem;

use super::group_health;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Create financial summary routes
pub fn summary_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(save_items))
        .route("/health", get(group_health))
        .route("/item", post(add_item))
        .route("/item/:item_id", put(update_item).delete(delete_item))
}

/// List summary items
#[utoipa::path(
    get,
    path = "/api/financial-summary",
    tag = "Financial Summary",
    responses(
        (status = 200, description = "All summary items", body = [Value])
    )
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<SummaryItem>>> {
    let items = state.summary_service.items().await?;
    Ok(Json(items))
}

/// Replace the summary
#[utoipa::path(
    post,
    path = "/api/financial-summary",
    tag = "Financial Summary",
    request_body = [Value],
    responses(
        (status = 200, description = "Financial summary data saved successfully"),
        (status = 400, description = "Invalid data format. Expected an array of items.")
    )
)]
pub async fn save_items(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<SummaryItem>>>> {
    let items = state.summary_service.save_items(body).await?;
    Ok(Json(ApiResponse::with_message(
        items,
        "Financial summary data saved successfully",
    )))
}

/// Add a summary item
#[utoipa::path(
    post,
    path = "/api/financial-summary/item",
    tag = "Financial Summary",
    request_body = Value,
    responses(
        (status = 201, description = "Summary item added successfully"),
        (status = 400, description = "Item id is required")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Vec<SummaryItem>>> {
    let items = state.summary_service.add_item(body).await?;
    Ok(Created(ApiResponse::with_message(
        items,
        "Summary item added successfully",
    )))
}

/// Merge fields into a summary item
#[utoipa::path(
    put,
    path = "/api/financial-summary/item/{item_id}",
    tag = "Financial Summary",
    params(("item_id" = String, Path, description = "Summary item id")),
    request_body = Value,
    responses(
        (status = 200, description = "Summary item updated successfully"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<SummaryItem>>>> {
    let items = state.summary_service.update_item(&item_id, body).await?;
    Ok(Json(ApiResponse::with_message(
        items,
        "Summary item updated successfully",
    )))
}

/// Delete a summary item
#[utoipa::path(
    delete,
    path = "/api/financial-summary/item/{item_id}",
    tag = "Financial Summary",
    params(("item_id" = String, Path, description = "Summary item id")),
    responses(
        (status = 200, description = "Summary item deleted successfully"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<SummaryItem>>>> {
    let items = state.summary_service.delete_item(&item_id).await?;
    Ok(Json(ApiResponse::with_message(
        items,
        "Summary item deleted successfully",
    )))
}
