//! Projects with their embedded tasks and team roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::fields::{self, Fields, Keyed, RESERVED_FIELDS};

/// Task embedded in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, with = "crate::dates::flexible", skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub due_date: Option<DateTime<Utc>>,
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Task {
    /// Build a task from a request body, requiring an `id`.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "task")?;
        let id = fields::string_field(&fields, "id")
            .ok_or_else(|| DomainError::validation("Task id is required"))?;
        fields.insert("id".to_string(), Value::String(id));
        fields::decode(Value::Object(fields), "task")
    }

    /// Build a replacement task whose id is pinned to `id`.
    pub fn replacement(id: &str, body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "task")?;
        fields.insert("id".to_string(), Value::String(id.to_string()));
        fields::decode(Value::Object(fields), "task")
    }
}

/// A project record. Unknown fields are kept as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "crate::dates::flexible", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::dates::flexible", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::numbers::lenient", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Project {
    /// Build a new project from a request body.
    pub fn from_request(body: Value) -> DomainResult<Self> {
        let mut fields = fields::require_object(body, "project")?;
        fields::strip_reserved(&mut fields);
        let project: Self = fields::decode(Value::Object(fields), "project")?;
        fields::ensure_unique_keys(&project.tasks, "Task")?;
        Ok(project)
    }

    /// Merge a request body into this project.
    pub fn merged(&self, body: Value) -> DomainResult<Self> {
        let patch = fields::require_object(body, "project")?;
        let project: Self = fields::merge_into(self, patch, RESERVED_FIELDS, "project")?;
        fields::ensure_unique_keys(&project.tasks, "Task")?;
        Ok(project)
    }

    pub fn add_task(&mut self, task: Task) -> DomainResult<()> {
        fields::push_unique(&mut self.tasks, task, "Task")
    }

    pub fn replace_task(&mut self, task_id: &str, task: Task) -> DomainResult<()> {
        fields::replace_keyed(&mut self.tasks, task_id, task, "Task")
    }

    pub fn remove_task(&mut self, task_id: &str) -> DomainResult<Task> {
        fields::remove_keyed(&mut self.tasks, task_id, "Task")
    }

    /// Add a member to the team. Returns false when already present.
    pub fn add_member(&mut self, member_id: &str) -> bool {
        if self.team.iter().any(|member| member == member_id) {
            return false;
        }
        self.team.push(member_id.to_string());
        true
    }

    /// Remove a member and unassign them from every task.
    pub fn remove_member(&mut self, member_id: &str) -> DomainResult<()> {
        let before = self.team.len();
        self.team.retain(|member| member != member_id);
        if self.team.len() == before {
            return Err(DomainError::not_found("Team member"));
        }

        for task in &mut self.tasks {
            if task.assigned_to.as_deref() == Some(member_id) {
                task.assigned_to = Some(String::new());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project() -> Project {
        Project::from_request(json!({
            "name": "Website",
            "budget": "25000",
            "startDate": "01/02/2024",
            "client": "Acme",
            "team": ["u1", "u2"],
            "tasks": [
                {"id": "t1", "name": "Design", "assignedTo": "u1"},
                {"id": "t2", "name": "Build", "assignedTo": "u2"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_from_request_keeps_extra_fields() {
        let project = project();
        assert_eq!(project.budget, Some(25000.0));
        assert_eq!(project.extra.get("client"), Some(&json!("Acme")));

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["startDate"], json!("2024-02-01T00:00:00.000Z"));
        assert_eq!(value["client"], json!("Acme"));
    }

    #[test]
    fn test_from_request_drops_reserved_fields() {
        let project = Project::from_request(json!({"_id": "x", "createdAt": "y", "name": "A"})).unwrap();
        assert!(project.extra.is_empty());
    }

    #[test]
    fn test_merge_overwrites_only_sent_fields() {
        let merged = project()
            .merged(json!({"status": "active", "_id": "ignored"}))
            .unwrap();
        assert_eq!(merged.status.as_deref(), Some("active"));
        assert_eq!(merged.name.as_deref(), Some("Website"));
        assert_eq!(merged.tasks.len(), 2);
        assert!(!merged.extra.contains_key("_id"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(Project::from_request(json!({"startDate": "someday"})).is_err());
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut project = project();
        assert!(!project.add_member("u1"));
        assert!(project.add_member("u3"));
        assert_eq!(project.team, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_remove_member_clears_assignments() {
        let mut project = project();
        project.remove_member("u1").unwrap();

        assert_eq!(project.team, vec!["u2"]);
        assert_eq!(project.tasks[0].assigned_to.as_deref(), Some(""));
        assert_eq!(project.tasks[1].assigned_to.as_deref(), Some("u2"));
        assert_eq!(
            project.remove_member("u1").unwrap_err(),
            DomainError::not_found("Team member")
        );
    }

    #[test]
    fn test_task_requires_id() {
        let err = Task::from_request(json!({"name": "No id"})).unwrap_err();
        assert_eq!(err, DomainError::validation("Task id is required"));
    }

    #[test]
    fn test_remove_task_keeps_others_in_order() {
        let mut project = project();
        project
            .add_task(Task::from_request(json!({"id": "t3"})).unwrap())
            .unwrap();
        project.remove_task("t2").unwrap();

        let ids: Vec<&str> = project.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }
}
