//! Subscription revenue handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use domain::SubscriptionRevenue;

use super::group_health;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{DeletedResponse, Record};

/// Create subscription revenue routes
pub fn revenue_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_revenue).post(create_revenue))
        .route("/health", get(group_health))
        .route("/bulk", post(bulk_replace))
        .route("/:id", put(update_revenue).delete(delete_revenue))
}

/// List revenue lines
#[utoipa::path(
    get,
    path = "/api/subscription-revenue",
    tag = "Subscription Revenue",
    responses(
        (status = 200, description = "All revenue lines", body = [SubscriptionRevenue])
    )
)]
pub async fn list_revenue(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Record<SubscriptionRevenue>>>> {
    let revenue = state.revenue_service.list_revenue().await?;
    Ok(Json(revenue))
}

/// Create a revenue line
#[utoipa::path(
    post,
    path = "/api/subscription-revenue",
    tag = "Subscription Revenue",
    request_body = SubscriptionRevenue,
    responses(
        (status = 201, description = "Revenue line created", body = SubscriptionRevenue),
        (status = 400, description = "Validation error or duplicate id")
    )
)]
pub async fn create_revenue(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<Record<SubscriptionRevenue>>)> {
    let revenue = state.revenue_service.create_revenue(body).await?;
    Ok((StatusCode::CREATED, Json(revenue)))
}

/// Merge fields into a revenue line
#[utoipa::path(
    put,
    path = "/api/subscription-revenue/{id}",
    tag = "Subscription Revenue",
    params(("id" = String, Path, description = "Revenue line id")),
    request_body = SubscriptionRevenue,
    responses(
        (status = 200, description = "Revenue line updated", body = SubscriptionRevenue),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_revenue(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<Record<SubscriptionRevenue>>> {
    let revenue = state.revenue_service.update_revenue(&id, body).await?;
    Ok(Json(revenue))
}

/// Delete a revenue line
#[utoipa::path(
    delete,
    path = "/api/subscription-revenue/{id}",
    tag = "Subscription Revenue",
    params(("id" = String, Path, description = "Revenue line id")),
    responses(
        (status = 200, description = "Item deleted successfully"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_revenue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    state.revenue_service.delete_revenue(&id).await?;
    Ok(Json(DeletedResponse::new(id, "Item deleted successfully")))
}

/// Replace every revenue line
#[utoipa::path(
    post,
    path = "/api/subscription-revenue/bulk",
    tag = "Subscription Revenue",
    request_body = Value,
    responses(
        (status = 200, description = "Revenue lines replaced", body = [SubscriptionRevenue]),
        (status = 400, description = "Items must be an array")
    )
)]
pub async fn bulk_replace(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<Vec<Record<SubscriptionRevenue>>>> {
    let revenue = state.revenue_service.bulk_replace(body).await?;
    Ok(Json(revenue))
}
