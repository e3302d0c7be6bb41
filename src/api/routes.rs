//! Application route configuration.

use std::any::Any;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    budget_routes, project_routes, revenue_routes, subscription_model_routes, summary_routes,
    tracking_routes,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::WELCOME_MESSAGE;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Resource groups
        .nest("/api/budget", budget_routes())
        .nest("/api/projects", project_routes())
        .nest("/api/project-tracking", tracking_routes())
        .nest("/api/subscription-revenue", revenue_routes())
        .nest("/api/subscription-model", subscription_model_routes())
        .nest("/api/financial-summary", summary_routes())
        .fallback(route_not_found)
        // Global middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    WELCOME_MESSAGE
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Turn a handler panic into the standard 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    AppError::internal(detail).into_response()
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with document store connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, healthy) = match state.store.ping().await {
        Ok(()) => (
            ServiceStatus {
                status: "healthy",
                error: None,
            },
            true,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Document store ping failed");
            (
                ServiceStatus {
                    status: "unhealthy",
                    error: Some(e.to_string()),
                },
                false,
            )
        }
    };

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        services: ServiceHealth { database },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
