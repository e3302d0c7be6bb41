//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{
    budget_handler, project_handler, revenue_handler, subscription_model_handler,
    summary_handler, tracking_handler,
};
use domain::{BudgetItem, BudgetSection, SubscriptionModel, SubscriptionRevenue, Task};

/// OpenAPI documentation for the Finance API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finance API",
        version = "0.1.0",
        description = "Budget, project, tracking, subscription and financial summary records"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        budget_handler::get_budget,
        budget_handler::save_budget,
        budget_handler::add_section,
        budget_handler::update_section,
        budget_handler::delete_section,
        budget_handler::add_item,
        budget_handler::update_item,
        budget_handler::delete_item,
        project_handler::list_projects,
        project_handler::create_project,
        project_handler::get_project,
        project_handler::update_project,
        project_handler::delete_project,
        project_handler::list_tasks,
        project_handler::add_task,
        project_handler::update_task,
        project_handler::delete_task,
        project_handler::list_team,
        project_handler::add_member,
        project_handler::remove_member,
        tracking_handler::list_items,
        tracking_handler::add_item,
        tracking_handler::update_item,
        tracking_handler::delete_item,
        revenue_handler::list_revenue,
        revenue_handler::create_revenue,
        revenue_handler::update_revenue,
        revenue_handler::delete_revenue,
        revenue_handler::bulk_replace,
        subscription_model_handler::list_models,
        subscription_model_handler::create_model,
        subscription_model_handler::get_model,
        subscription_model_handler::update_model,
        subscription_model_handler::delete_model,
        subscription_model_handler::bulk_replace,
        summary_handler::list_items,
        summary_handler::save_items,
        summary_handler::add_item,
        summary_handler::update_item,
        summary_handler::delete_item,
    ),
    components(
        schemas(
            BudgetItem,
            BudgetSection,
            Task,
            SubscriptionRevenue,
            SubscriptionModel,
            project_handler::AddMemberRequest,
        )
    ),
    tags(
        (name = "Budget", description = "Budget sections and items"),
        (name = "Projects", description = "Projects, tasks and team members"),
        (name = "Project Tracking", description = "Project tracking sheet rows"),
        (name = "Subscription Revenue", description = "Projected subscription revenue"),
        (name = "Subscription Models", description = "Subscription plans"),
        (name = "Financial Summary", description = "Financial summary line items")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_group_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/budget",
            "/api/projects/{project_id}/team",
            "/api/project-tracking/{item_id}",
            "/api/subscription-revenue/bulk",
            "/api/subscription-model/{id}",
            "/api/financial-summary/item/{item_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
