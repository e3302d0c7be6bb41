//! Budget service - Sections and cost lines of the budget sheet.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use domain::fields as domain_fields;
use domain::{BudgetDocument, BudgetItem, BudgetSection, DomainResult};

use super::document_ops::{self, Mutation, Target};
use crate::config::COLLECTION_BUDGET;
use crate::errors::{AppError, AppResult};
use crate::infra::DocumentStore;

const BUDGET: &str = "Budget";

/// Budget service trait for dependency injection.
///
/// Every mutation returns the full list of sections as stored.
#[async_trait]
pub trait BudgetService: Send + Sync {
    /// All sections, empty when no budget exists yet
    async fn sections(&self) -> AppResult<Vec<BudgetSection>>;

    /// Replace every section, creating the budget if needed
    async fn save_sections(&self, body: Value) -> AppResult<Vec<BudgetSection>>;

    /// Append an empty section, creating the budget if needed
    async fn add_section(&self, body: Value) -> AppResult<Vec<BudgetSection>>;

    async fn update_section(&self, section_id: &str, body: Value) -> AppResult<Vec<BudgetSection>>;

    async fn delete_section(&self, section_id: &str) -> AppResult<Vec<BudgetSection>>;

    async fn add_item(&self, section_id: &str, body: Value) -> AppResult<Vec<BudgetSection>>;

    async fn update_item(
        &self,
        section_id: &str,
        item_id: &str,
        body: Value,
    ) -> AppResult<Vec<BudgetSection>>;

    async fn delete_item(&self, section_id: &str, item_id: &str) -> AppResult<Vec<BudgetSection>>;
}

/// Concrete implementation of BudgetService.
pub struct BudgetManager {
    store: Arc<dyn DocumentStore>,
}

impl BudgetManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn update<F>(&self, create_missing: bool, mut change: F) -> AppResult<Vec<BudgetSection>>
    where
        F: FnMut(&mut BudgetDocument) -> DomainResult<()> + Send,
    {
        let mut target = Target::singleton(COLLECTION_BUDGET, BUDGET);
        if create_missing {
            target = target.or_create();
        }

        let (sections, _) =
            document_ops::modify(self.store.as_ref(), target, |budget: &mut BudgetDocument| {
                change(budget)?;
                Ok(Mutation::Changed(budget.sections.clone()))
            })
            .await?;
        Ok(sections)
    }
}

#[async_trait]
impl BudgetService for BudgetManager {
    async fn sections(&self) -> AppResult<Vec<BudgetSection>> {
        let budget: BudgetDocument =
            document_ops::load_singleton(self.store.as_ref(), COLLECTION_BUDGET).await?;
        Ok(budget.sections)
    }

    async fn save_sections(&self, body: Value) -> AppResult<Vec<BudgetSection>> {
        let sections: Vec<BudgetSection> = domain_fields::decode(body, "sections")?;
        let count = sections.len();

        let saved = self
            .update(true, |budget| budget.replace_sections(sections.clone()))
            .await?;
        tracing::info!(sections = count, "Budget saved");
        Ok(saved)
    }

    async fn add_section(&self, body: Value) -> AppResult<Vec<BudgetSection>> {
        let fields = domain_fields::require_object(body, "section")?;
        let (Some(id), Some(name)) = (
            domain_fields::string_field(&fields, "id"),
            domain_fields::string_field(&fields, "name"),
        ) else {
            return Err(AppError::validation("Section name and id are required"));
        };
        let section = BudgetSection::new(id.clone(), name);

        let sections = self
            .update(true, |budget| budget.add_section(section.clone()))
            .await?;
        tracing::info!(section_id = %id, "Budget section added");
        Ok(sections)
    }

    async fn update_section(&self, section_id: &str, body: Value) -> AppResult<Vec<BudgetSection>> {
        let section = BudgetSection::replacement(section_id, body)?;

        let sections = self
            .update(false, |budget| budget.replace_section(section_id, section.clone()))
            .await?;
        tracing::info!(section_id, "Budget section updated");
        Ok(sections)
    }

    async fn delete_section(&self, section_id: &str) -> AppResult<Vec<BudgetSection>> {
        let sections = self
            .update(false, |budget| budget.remove_section(section_id).map(|_| ()))
            .await?;
        tracing::info!(section_id, "Budget section deleted");
        Ok(sections)
    }

    async fn add_item(&self, section_id: &str, body: Value) -> AppResult<Vec<BudgetSection>> {
        let item = BudgetItem::from_request(body)?;

        let sections = self
            .update(false, |budget| {
                budget.section_mut(section_id)?.add_item(item.clone())
            })
            .await?;
        tracing::info!(section_id, item_id = %item.id, "Budget item added");
        Ok(sections)
    }

    async fn update_item(
        &self,
        section_id: &str,
        item_id: &str,
        body: Value,
    ) -> AppResult<Vec<BudgetSection>> {
        let item = BudgetItem::replacement(item_id, body)?;

        let sections = self
            .update(false, |budget| {
                budget
                    .section_mut(section_id)?
                    .replace_item(item_id, item.clone())
            })
            .await?;
        tracing::info!(section_id, item_id, "Budget item updated");
        Ok(sections)
    }

    async fn delete_item(&self, section_id: &str, item_id: &str) -> AppResult<Vec<BudgetSection>> {
        let sections = self
            .update(false, |budget| {
                budget.section_mut(section_id)?.remove_item(item_id).map(|_| ())
            })
            .await?;
        tracing::info!(section_id, item_id, "Budget item deleted");
        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use serde_json::json;

    fn manager() -> BudgetManager {
        BudgetManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_sections_empty_without_budget() {
        assert!(manager().sections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_section_requires_fields_before_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        store.expect_insert().never();
        let manager = BudgetManager::new(Arc::new(store));

        let err = manager.add_section(json!({"id": "s1"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Section name and id are required"));
    }

    #[tokio::test]
    async fn test_add_section_rejects_non_text_fields() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        store.expect_insert().never();
        let manager = BudgetManager::new(Arc::new(store));

        let err = manager
            .add_section(json!({"id": {"x": 1}, "name": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Section name and id are required"));
    }

    #[tokio::test]
    async fn test_add_item_requires_id_before_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        let manager = BudgetManager::new(Arc::new(store));

        let err = manager.add_item("s1", json!({"category": "Rent"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Item id is required"));
    }

    #[tokio::test]
    async fn test_section_lifecycle() {
        let manager = manager();
        manager.add_section(json!({"id": "s1", "name": "Ops"})).await.unwrap();
        manager.add_section(json!({"id": "s2", "name": "Sales"})).await.unwrap();

        let sections = manager
            .add_item("s1", json!({"id": "i1", "monthlyCost": 100}))
            .await
            .unwrap();
        assert_eq!(sections[0].items.len(), 1);

        let sections = manager
            .update_item("s1", "i1", json!({"monthlyCost": 250, "category": "Rent"}))
            .await
            .unwrap();
        assert_eq!(sections[0].items[0].id, "i1");
        assert_eq!(sections[0].items[0].monthly_cost, Some(250.0));

        let sections = manager.delete_section("s1").await.unwrap();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s2"]);
    }

    #[tokio::test]
    async fn test_missing_budget_and_section_are_not_found() {
        let manager = manager();
        let err = manager.delete_section("s1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(entity) if entity == "Budget"));

        manager.add_section(json!({"id": "s1", "name": "Ops"})).await.unwrap();
        let err = manager.add_item("nope", json!({"id": "i1"})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(entity) if entity == "Section"));

        let err = manager.delete_item("s1", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(entity) if entity == "Item"));
    }

    #[tokio::test]
    async fn test_save_sections_replaces_all() {
        let manager = manager();
        manager.add_section(json!({"id": "old", "name": "Old"})).await.unwrap();

        let saved = manager
            .save_sections(json!([{"id": "a", "name": "A", "items": [{"id": "x"}]}]))
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(manager.sections().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_duplicate_section_id_is_rejected() {
        let manager = manager();
        manager.add_section(json!({"id": "s1", "name": "Ops"})).await.unwrap();
        let err = manager
            .add_section(json!({"id": "s1", "name": "Again"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
