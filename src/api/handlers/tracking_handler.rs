//! Project tracking handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};

use domain::TrackingItem;

use super::group_health;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, DeletedResponse};

/// Create project tracking routes
pub fn tracking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/health", get(group_health))
        .route("/item", post(add_item))
        .route("/:item_id", put(update_item).delete(delete_item))
}

/// List tracking rows
#[utoipa::path(
    get,
    path = "/api/project-tracking",
    tag = "Project Tracking",
    responses(
        (status = 200, description = "All tracking rows", body = [Value])
    )
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<TrackingItem>>> {
    let items = state.tracking_service.items().await?;
    Ok(Json(items))
}

/// Add a tracking row
#[utoipa::path(
    post,
    path = "/api/project-tracking/item",
    tag = "Project Tracking",
    request_body = Value,
    responses(
        (status = 201, description = "Project tracking item added successfully"),
        (status = 400, description = "Missing required field or invalid date/number")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<TrackingItem>> {
    let item = state.tracking_service.add_item(body).await?;
    Ok(Created(ApiResponse::with_message(
        item,
        "Project tracking item added successfully",
    )))
}

/// Merge fields into a tracking row
#[utoipa::path(
    put,
    path = "/api/project-tracking/{item_id}",
    tag = "Project Tracking",
    params(("item_id" = String, Path, description = "Row key (`_id`)")),
    request_body = Value,
    responses(
        (status = 200, description = "Item updated, or no changes made"),
        (status = 400, description = "Temporary or invalid id, bad date format"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<TrackingItem>>> {
    let response = match state.tracking_service.update_item(&item_id, body).await? {
        Some(item) => ApiResponse::with_message(item, "Item updated successfully"),
        None => ApiResponse::notice("No changes made (data already up to date)"),
    };
    Ok(Json(response))
}

/// Delete a tracking row
#[utoipa::path(
    delete,
    path = "/api/project-tracking/{item_id}",
    tag = "Project Tracking",
    params(("item_id" = String, Path, description = "Row key (`_id`)")),
    responses(
        (status = 200, description = "Item deleted successfully"),
        (status = 400, description = "Temporary or invalid id"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    let key = state.tracking_service.delete_item(&item_id).await?;
    Ok(Json(
        DeletedResponse::new(key.to_string(), "Item deleted successfully").with_count(1),
    ))
}
