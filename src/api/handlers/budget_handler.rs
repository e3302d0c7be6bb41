//! Budget handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use domain::BudgetSection;

use super::group_health;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Create budget routes
pub fn budget_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_budget).post(save_budget))
        .route("/health", get(group_health))
        .route("/section", post(add_section))
        .route("/section/:section_id", put(update_section).delete(delete_section))
        .route("/section/:section_id/item", post(add_item))
        .route(
            "/section/:section_id/item/:item_id",
            put(update_item).delete(delete_item),
        )
}

/// Get all budget sections
#[utoipa::path(
    get,
    path = "/api/budget",
    tag = "Budget",
    responses(
        (status = 200, description = "Budget sections", body = [BudgetSection])
    )
)]
pub async fn get_budget(State(state): State<AppState>) -> AppResult<Json<Vec<BudgetSection>>> {
    let sections = state.budget_service.sections().await?;
    Ok(Json(sections))
}

/// Replace the whole budget
#[utoipa::path(
    post,
    path = "/api/budget",
    tag = "Budget",
    request_body = [BudgetSection],
    responses(
        (status = 200, description = "Budget data saved successfully"),
        (status = 400, description = "Malformed sections or duplicate ids")
    )
)]
pub async fn save_budget(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<BudgetSection>>>> {
    let sections = state.budget_service.save_sections(body).await?;
    Ok(Json(ApiResponse::with_message(
        sections,
        "Budget data saved successfully",
    )))
}

/// Add an empty section
#[utoipa::path(
    post,
    path = "/api/budget/section",
    tag = "Budget",
    request_body = BudgetSection,
    responses(
        (status = 201, description = "Section added successfully"),
        (status = 400, description = "Section name and id are required")
    )
)]
pub async fn add_section(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Vec<BudgetSection>>> {
    let sections = state.budget_service.add_section(body).await?;
    Ok(Created(ApiResponse::with_message(
        sections,
        "Section added successfully",
    )))
}

/// Replace a section
#[utoipa::path(
    put,
    path = "/api/budget/section/{section_id}",
    tag = "Budget",
    params(("section_id" = String, Path, description = "Section id")),
    request_body = BudgetSection,
    responses(
        (status = 200, description = "Section updated successfully"),
        (status = 404, description = "Budget or section not found")
    )
)]
pub async fn update_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<BudgetSection>>>> {
    let sections = state
        .budget_service
        .update_section(&section_id, body)
        .await?;
    Ok(Json(ApiResponse::with_message(
        sections,
        "Section updated successfully",
    )))
}

/// Delete a section
#[utoipa::path(
    delete,
    path = "/api/budget/section/{section_id}",
    tag = "Budget",
    params(("section_id" = String, Path, description = "Section id")),
    responses(
        (status = 200, description = "Section deleted successfully"),
        (status = 404, description = "Budget or section not found")
    )
)]
pub async fn delete_section(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<BudgetSection>>>> {
    let sections = state.budget_service.delete_section(&section_id).await?;
    Ok(Json(ApiResponse::with_message(
        sections,
        "Section deleted successfully",
    )))
}

/// Add an item to a section
#[utoipa::path(
    post,
    path = "/api/budget/section/{section_id}/item",
    tag = "Budget",
    params(("section_id" = String, Path, description = "Section id")),
    request_body = BudgetItem,
    responses(
        (status = 201, description = "Item added successfully"),
        (status = 400, description = "Item id is required"),
        (status = 404, description = "Budget or section not found")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Vec<BudgetSection>>> {
    let sections = state.budget_service.add_item(&section_id, body).await?;
    Ok(Created(ApiResponse::with_message(
        sections,
        "Item added successfully",
    )))
}

/// Replace an item
#[utoipa::path(
    put,
    path = "/api/budget/section/{section_id}/item/{item_id}",
    tag = "Budget",
    params(
        ("section_id" = String, Path, description = "Section id"),
        ("item_id" = String, Path, description = "Item id")
    ),
    request_body = BudgetItem,
    responses(
        (status = 200, description = "Item updated successfully"),
        (status = 404, description = "Budget, section or item not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path((section_id, item_id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<BudgetSection>>>> {
    let sections = state
        .budget_service
        .update_item(&section_id, &item_id, body)
        .await?;
    Ok(Json(ApiResponse::with_message(
        sections,
        "Item updated successfully",
    )))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/budget/section/{section_id}/item/{item_id}",
    tag = "Budget",
    params(
        ("section_id" = String, Path, description = "Section id"),
        ("item_id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted successfully"),
        (status = 404, description = "Budget, section or item not found")
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((section_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<BudgetSection>>>> {
    let sections = state
        .budget_service
        .delete_item(&section_id, &item_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        sections,
        "Item deleted successfully",
    )))
}
