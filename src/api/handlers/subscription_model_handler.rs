//! Subscription model handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use domain::SubscriptionModel;

use super::group_health;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{BulkResponse, DeletedResponse, Record};

/// Create subscription model routes
pub fn subscription_model_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_models).post(create_model))
        .route("/health", get(group_health))
        .route("/bulk", post(bulk_replace))
        .route("/:id", get(get_model).put(update_model).delete(delete_model))
}

/// List plans, newest first
#[utoipa::path(
    get,
    path = "/api/subscription-model",
    tag = "Subscription Models",
    responses(
        (status = 200, description = "All subscription models", body = [SubscriptionModel])
    )
)]
pub async fn list_models(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Record<SubscriptionModel>>>> {
    let models = state.subscription_model_service.list_models().await?;
    Ok(Json(models))
}

/// Create a plan
#[utoipa::path(
    post,
    path = "/api/subscription-model",
    tag = "Subscription Models",
    request_body = SubscriptionModel,
    responses(
        (status = 201, description = "Subscription model created", body = SubscriptionModel),
        (status = 400, description = "Subscription model with this ID already exists")
    )
)]
pub async fn create_model(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<(StatusCode, Json<Record<SubscriptionModel>>)> {
    let model = state.subscription_model_service.create_model(body).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

/// Get a plan by id
#[utoipa::path(
    get,
    path = "/api/subscription-model/{id}",
    tag = "Subscription Models",
    params(("id" = String, Path, description = "Subscription model id")),
    responses(
        (status = 200, description = "Subscription model found", body = SubscriptionModel),
        (status = 404, description = "Subscription model not found")
    )
)]
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Record<SubscriptionModel>>> {
    let model = state.subscription_model_service.get_model(&id).await?;
    Ok(Json(model))
}

/// Update the revenue figures of a plan
#[utoipa::path(
    put,
    path = "/api/subscription-model/{id}",
    tag = "Subscription Models",
    params(("id" = String, Path, description = "Subscription model id")),
    request_body = Value,
    responses(
        (status = 200, description = "Subscription model updated", body = SubscriptionModel),
        (status = 404, description = "Subscription item not found")
    )
)]
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<Record<SubscriptionModel>>> {
    let model = state
        .subscription_model_service
        .update_model(&id, body)
        .await?;
    Ok(Json(model))
}

/// Delete a plan
#[utoipa::path(
    delete,
    path = "/api/subscription-model/{id}",
    tag = "Subscription Models",
    params(("id" = String, Path, description = "Subscription model id")),
    responses(
        (status = 200, description = "Subscription model deleted successfully"),
        (status = 404, description = "Subscription model not found")
    )
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    state.subscription_model_service.delete_model(&id).await?;
    Ok(Json(DeletedResponse::new(
        id,
        "Subscription model deleted successfully",
    )))
}

/// Replace every plan
#[utoipa::path(
    post,
    path = "/api/subscription-model/bulk",
    tag = "Subscription Models",
    request_body = Value,
    responses(
        (status = 200, description = "Bulk operation completed successfully"),
        (status = 400, description = "Request body must contain an 'items' array")
    )
)]
pub async fn bulk_replace(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<BulkResponse<Record<SubscriptionModel>>>> {
    let models = state.subscription_model_service.bulk_replace(body).await?;
    Ok(Json(BulkResponse::new(
        models,
        "Bulk operation completed successfully",
    )))
}
