//! Project handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use domain::{Project, Task};

use super::group_health;
use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Record};

/// Team member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// Identifier of the member to add
    #[serde(default, deserialize_with = "domain::fields::lenient_string")]
    #[validate(required(message = "Member ID is required"))]
    #[schema(example = "user-42")]
    pub member_id: Option<String>,
}

/// Create project routes
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/health", get(group_health))
        .route(
            "/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:project_id/tasks", get(list_tasks).post(add_task))
        .route("/:project_id/tasks/:task_id", put(update_task).delete(delete_task))
        .route("/:project_id/team", get(list_team).post(add_member))
        .route("/:project_id/team/:member_id", delete(remove_member))
}

/// List projects in creation order
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "All projects", body = [Value])
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Record<Project>>>> {
    let projects = state.project_service.list_projects().await?;
    Ok(Json(projects))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = Value,
    responses(
        (status = 201, description = "Project created successfully"),
        (status = 400, description = "Malformed project")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Record<Project>>> {
    let project = state.project_service.create_project(body).await?;
    Ok(Created(ApiResponse::with_message(
        project,
        "Project created successfully",
    )))
}

/// Get a project by id
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = Value),
        (status = 400, description = "Invalid project ID format"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<Record<Project>>> {
    let project = state.project_service.get_project(&project_id).await?;
    Ok(Json(project))
}

/// Merge fields into a project
#[utoipa::path(
    put,
    path = "/api/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    request_body = Value,
    responses(
        (status = 200, description = "Project updated successfully"),
        (status = 400, description = "Invalid project ID format"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Record<Project>>>> {
    let project = state
        .project_service
        .update_project(&project_id, body)
        .await?;
    Ok(Json(ApiResponse::with_message(
        project,
        "Project updated successfully",
    )))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted successfully"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.project_service.delete_project(&project_id).await?;
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}

/// List the tasks of a project
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/tasks",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project tasks", body = [Task]),
        (status = 404, description = "Project not found")
    )
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.project_service.tasks(&project_id).await?;
    Ok(Json(tasks))
}

/// Add a task
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/tasks",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    request_body = Task,
    responses(
        (status = 201, description = "Task added successfully"),
        (status = 400, description = "Task id is required"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn add_task(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Vec<Task>>> {
    let tasks = state.project_service.add_task(&project_id, body).await?;
    Ok(Created(ApiResponse::with_message(
        tasks,
        "Task added successfully",
    )))
}

/// Replace a task
#[utoipa::path(
    put,
    path = "/api/projects/{project_id}/tasks/{task_id}",
    tag = "Projects",
    params(
        ("project_id" = String, Path, description = "Project id"),
        ("task_id" = String, Path, description = "Task id")
    ),
    request_body = Task,
    responses(
        (status = 200, description = "Task updated successfully"),
        (status = 404, description = "Project or task not found")
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Vec<Task>>>> {
    let tasks = state
        .project_service
        .update_task(&project_id, &task_id, body)
        .await?;
    Ok(Json(ApiResponse::with_message(
        tasks,
        "Task updated successfully",
    )))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}/tasks/{task_id}",
    tag = "Projects",
    params(
        ("project_id" = String, Path, description = "Project id"),
        ("task_id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task deleted successfully"),
        (status = 404, description = "Project or task not found")
    )
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<Task>>>> {
    let tasks = state
        .project_service
        .delete_task(&project_id, &task_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        tasks,
        "Task deleted successfully",
    )))
}

/// List team members
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/team",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Team member ids", body = [String]),
        (status = 404, description = "Project not found")
    )
)]
pub async fn list_team(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    let team = state.project_service.team(&project_id).await?;
    Ok(Json(team))
}

/// Add a team member
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/team",
    tag = "Projects",
    params(("project_id" = String, Path, description = "Project id")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Team member added successfully"),
        (status = 400, description = "Member ID is required"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<AddMemberRequest>,
) -> AppResult<Created<Vec<String>>> {
    let member_id = payload.member_id.unwrap_or_default();
    let team = state
        .project_service
        .add_member(&project_id, &member_id)
        .await?;
    Ok(Created(ApiResponse::with_message(
        team,
        "Team member added successfully",
    )))
}

/// Remove a team member and unassign their tasks
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}/team/{member_id}",
    tag = "Projects",
    params(
        ("project_id" = String, Path, description = "Project id"),
        ("member_id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Team member removed successfully"),
        (status = 404, description = "Project or team member not found")
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let team = state
        .project_service
        .remove_member(&project_id, &member_id)
        .await?;
    Ok(Json(ApiResponse::with_message(
        team,
        "Team member removed successfully",
    )))
}
