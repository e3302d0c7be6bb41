//! HTTP request handlers.

pub mod budget_handler;
pub mod project_handler;
pub mod revenue_handler;
pub mod subscription_model_handler;
pub mod summary_handler;
pub mod tracking_handler;

pub use budget_handler::budget_routes;
pub use project_handler::project_routes;
pub use revenue_handler::revenue_routes;
pub use subscription_model_handler::subscription_model_routes;
pub use summary_handler::summary_routes;
pub use tracking_handler::tracking_routes;

/// Liveness probe mounted under every resource group
pub async fn group_health() -> &'static str {
    "OK"
}
