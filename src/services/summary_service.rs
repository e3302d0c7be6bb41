//! Financial summary service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use domain::{SummaryDocument, SummaryItem};

use super::document_ops::{self, Mutation, Target};
use crate::config::COLLECTION_FINANCIAL_SUMMARY;
use crate::errors::AppResult;
use crate::infra::DocumentStore;

const SUMMARY: &str = "Financial summary";

/// Financial summary service trait for dependency injection.
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn items(&self) -> AppResult<Vec<SummaryItem>>;

    /// Replace the whole item list
    async fn save_items(&self, body: Value) -> AppResult<Vec<SummaryItem>>;

    async fn add_item(&self, body: Value) -> AppResult<Vec<SummaryItem>>;

    async fn update_item(&self, item_id: &str, body: Value) -> AppResult<Vec<SummaryItem>>;

    async fn delete_item(&self, item_id: &str) -> AppResult<Vec<SummaryItem>>;
}

/// Concrete implementation of SummaryService.
pub struct SummaryManager {
    store: Arc<dyn DocumentStore>,
}

impl SummaryManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn update<F>(&self, create_missing: bool, mut apply: F) -> AppResult<Vec<SummaryItem>>
    where
        F: FnMut(&mut SummaryDocument) -> AppResult<()> + Send,
    {
        let mut target = Target::singleton(COLLECTION_FINANCIAL_SUMMARY, SUMMARY);
        if create_missing {
            target = target.or_create();
        }

        let (items, _) =
            document_ops::modify(self.store.as_ref(), target, |summary: &mut SummaryDocument| {
                apply(summary)?;
                Ok(Mutation::Changed(summary.items.clone()))
            })
            .await?;
        Ok(items)
    }
}

#[async_trait]
impl SummaryService for SummaryManager {
    async fn items(&self) -> AppResult<Vec<SummaryItem>> {
        let summary: SummaryDocument =
            document_ops::load_singleton(self.store.as_ref(), COLLECTION_FINANCIAL_SUMMARY).await?;
        Ok(summary.items)
    }

    async fn save_items(&self, body: Value) -> AppResult<Vec<SummaryItem>> {
        let replacement = SummaryDocument::items_from_request(body)?;

        let items = self
            .update(true, |summary| {
                summary.items = replacement.clone();
                Ok(())
            })
            .await?;

        tracing::info!(items = items.len(), "Financial summary saved");
        Ok(items)
    }

    async fn add_item(&self, body: Value) -> AppResult<Vec<SummaryItem>> {
        let item = SummaryItem::from_request(body)?;

        let items = self
            .update(true, |summary| Ok(summary.add_item(item.clone())?))
            .await?;

        tracing::info!(item_id = ?item.id, "Summary item added");
        Ok(items)
    }

    async fn update_item(&self, item_id: &str, body: Value) -> AppResult<Vec<SummaryItem>> {
        SummaryItem::validate_patch(&body)?;
        let items = self
            .update(false, |summary| {
                summary.update_item(item_id, body.clone())?;
                Ok(())
            })
            .await?;

        tracing::info!(item_id, "Summary item updated");
        Ok(items)
    }

    async fn delete_item(&self, item_id: &str) -> AppResult<Vec<SummaryItem>> {
        let items = self
            .update(false, |summary| {
                summary.remove_item(item_id)?;
                Ok(())
            })
            .await?;

        tracing::info!(item_id, "Summary item deleted");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use serde_json::json;

    fn manager() -> SummaryManager {
        SummaryManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_empty_summary_lists_nothing() {
        assert!(manager().items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_list_never_touches_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        let manager = SummaryManager::new(Arc::new(store));

        let err = manager.save_items(json!({"id": 1})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_malformed_item_update_never_touches_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        let manager = SummaryManager::new(Arc::new(store));

        let err = manager.update_item("x", json!("str")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_with_shared_ids_never_touches_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        let manager = SummaryManager::new(Arc::new(store));

        let err = manager
            .save_items(json!([{"id": "a", "value": 1}, {"id": "a", "value": 2}]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("'a'")));
    }

    #[tokio::test]
    async fn test_save_then_edit_items() {
        let manager = manager();
        manager
            .save_items(json!([
                {"id": "1", "item": "Revenue", "value": 100},
                {"id": "2", "item": "Costs", "value": 40}
            ]))
            .await
            .unwrap();

        let items = manager.add_item(json!({"id": "3", "item": "Margin"})).await.unwrap();
        assert_eq!(items.len(), 3);

        let items = manager
            .update_item("2", json!({"id": "99", "value": 55}))
            .await
            .unwrap();
        assert_eq!(items[1].id.as_deref(), Some("2"));
        assert_eq!(items[1].value, Some(55.0));
        assert_eq!(items[1].item.as_deref(), Some("Costs"));

        let items = manager.delete_item("1").await.unwrap();
        let ids: Vec<_> = items.iter().filter_map(|i| i.id.as_deref()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let manager = manager();
        manager.save_items(json!([])).await.unwrap();
        let err = manager.delete_item("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Item not found");
    }
}
