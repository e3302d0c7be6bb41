//! Project service - Projects, their tasks and team roster.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use domain::fields as domain_fields;
use domain::{DomainResult, Project, Task};

use super::document_ops::{self, parse_key, Mutation, Target};
use crate::config::COLLECTION_PROJECTS;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{DocumentStore, SortOrder};
use crate::types::Record;

const PROJECT: &str = "Project";

/// Project service trait for dependency injection.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// All projects in creation order
    async fn list_projects(&self) -> AppResult<Vec<Record<Project>>>;

    async fn create_project(&self, body: Value) -> AppResult<Record<Project>>;

    async fn get_project(&self, project_id: &str) -> AppResult<Record<Project>>;

    /// Merge the body's fields into the stored project
    async fn update_project(&self, project_id: &str, body: Value) -> AppResult<Record<Project>>;

    async fn delete_project(&self, project_id: &str) -> AppResult<()>;

    async fn tasks(&self, project_id: &str) -> AppResult<Vec<Task>>;

    async fn add_task(&self, project_id: &str, body: Value) -> AppResult<Vec<Task>>;

    async fn update_task(&self, project_id: &str, task_id: &str, body: Value) -> AppResult<Vec<Task>>;

    async fn delete_task(&self, project_id: &str, task_id: &str) -> AppResult<Vec<Task>>;

    async fn team(&self, project_id: &str) -> AppResult<Vec<String>>;

    /// Add a member; adding an existing member changes nothing
    async fn add_member(&self, project_id: &str, member_id: &str) -> AppResult<Vec<String>>;

    /// Remove a member and unassign their tasks
    async fn remove_member(&self, project_id: &str, member_id: &str) -> AppResult<Vec<String>>;
}

/// Concrete implementation of ProjectService.
pub struct ProjectManager {
    store: Arc<dyn DocumentStore>,
}

impl ProjectManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn load(&self, project_id: &str) -> AppResult<Project> {
        let key = parse_key(project_id, "project")?;
        let document = self
            .store
            .find(COLLECTION_PROJECTS, key)
            .await?
            .ok_or_not_found(PROJECT)?;
        document_ops::decode(&document)
    }

    async fn update<R, F>(&self, project_id: &str, mut change: F) -> AppResult<R>
    where
        R: Send,
        F: FnMut(&mut Project) -> DomainResult<Mutation<R>> + Send,
    {
        let key = parse_key(project_id, "project")?;
        let target = Target::document(COLLECTION_PROJECTS, key, PROJECT);
        let (result, _) = document_ops::modify(self.store.as_ref(), target, |project: &mut Project| {
            Ok(change(project)?)
        })
        .await?;
        Ok(result)
    }
}

#[async_trait]
impl ProjectService for ProjectManager {
    async fn list_projects(&self) -> AppResult<Vec<Record<Project>>> {
        let documents = self.store.list(COLLECTION_PROJECTS, SortOrder::Oldest).await?;
        Record::from_documents(&documents)
    }

    async fn create_project(&self, body: Value) -> AppResult<Record<Project>> {
        let project = Project::from_request(body)?;
        let key = Uuid::new_v4();

        let document = self
            .store
            .insert(COLLECTION_PROJECTS, key, document_ops::encode(&project)?)
            .await?
            .ok_or_else(|| AppError::conflict("Project key already in use, please retry"))?;

        tracing::info!(project_id = %key, "Project created");
        Record::from_document(&document)
    }

    async fn get_project(&self, project_id: &str) -> AppResult<Record<Project>> {
        let key = parse_key(project_id, "project")?;
        let document = self
            .store
            .find(COLLECTION_PROJECTS, key)
            .await?
            .ok_or_not_found(PROJECT)?;
        Record::from_document(&document)
    }

    async fn update_project(&self, project_id: &str, body: Value) -> AppResult<Record<Project>> {
        domain_fields::require_object(body.clone(), "project")?;
        let key = parse_key(project_id, "project")?;
        let target = Target::document(COLLECTION_PROJECTS, key, PROJECT);

        let (_, document) = document_ops::modify(self.store.as_ref(), target, |project: &mut Project| {
            *project = project.merged(body.clone())?;
            Ok(Mutation::Changed(()))
        })
        .await?;

        tracing::info!(project_id, "Project updated");
        Record::from_document(&document.ok_or_not_found(PROJECT)?)
    }

    async fn delete_project(&self, project_id: &str) -> AppResult<()> {
        let key = parse_key(project_id, "project")?;
        if !self.store.delete(COLLECTION_PROJECTS, key).await? {
            return Err(AppError::not_found(PROJECT));
        }
        tracing::info!(project_id, "Project deleted");
        Ok(())
    }

    async fn tasks(&self, project_id: &str) -> AppResult<Vec<Task>> {
        Ok(self.load(project_id).await?.tasks)
    }

    async fn add_task(&self, project_id: &str, body: Value) -> AppResult<Vec<Task>> {
        let task = Task::from_request(body)?;

        let tasks = self
            .update(project_id, |project| {
                project.add_task(task.clone())?;
                Ok(Mutation::Changed(project.tasks.clone()))
            })
            .await?;
        tracing::info!(project_id, task_id = %task.id, "Task added");
        Ok(tasks)
    }

    async fn update_task(&self, project_id: &str, task_id: &str, body: Value) -> AppResult<Vec<Task>> {
        let task = Task::replacement(task_id, body)?;

        let tasks = self
            .update(project_id, |project| {
                project.replace_task(task_id, task.clone())?;
                Ok(Mutation::Changed(project.tasks.clone()))
            })
            .await?;
        tracing::info!(project_id, task_id, "Task updated");
        Ok(tasks)
    }

    async fn delete_task(&self, project_id: &str, task_id: &str) -> AppResult<Vec<Task>> {
        let tasks = self
            .update(project_id, |project| {
                project.remove_task(task_id)?;
                Ok(Mutation::Changed(project.tasks.clone()))
            })
            .await?;
        tracing::info!(project_id, task_id, "Task deleted");
        Ok(tasks)
    }

    async fn team(&self, project_id: &str) -> AppResult<Vec<String>> {
        Ok(self.load(project_id).await?.team)
    }

    async fn add_member(&self, project_id: &str, member_id: &str) -> AppResult<Vec<String>> {
        if member_id.trim().is_empty() {
            return Err(AppError::validation("Member ID is required"));
        }

        let team = self
            .update(project_id, |project| {
                if project.add_member(member_id) {
                    Ok(Mutation::Changed(project.team.clone()))
                } else {
                    Ok(Mutation::Unchanged(project.team.clone()))
                }
            })
            .await?;
        tracing::info!(project_id, member_id, "Team member added");
        Ok(team)
    }

    async fn remove_member(&self, project_id: &str, member_id: &str) -> AppResult<Vec<String>> {
        let team = self
            .update(project_id, |project| {
                project.remove_member(member_id)?;
                Ok(Mutation::Changed(project.team.clone()))
            })
            .await?;
        tracing::info!(project_id, member_id, "Team member removed");
        Ok(team)
    }
}
