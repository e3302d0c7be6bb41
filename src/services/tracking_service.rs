//! Project tracking service - Rows of the tracking sheet.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use domain::fields as domain_fields;
use domain::tracking::{normalize_fields, Coercion};
use domain::{parse_row_key, RowAction, TrackingDocument, TrackingItem};

use super::document_ops::{self, Mutation, Target};
use crate::config::COLLECTION_PROJECT_TRACKING;
use crate::errors::AppResult;
use crate::infra::DocumentStore;

const ITEM: &str = "Item";

/// Project tracking service trait for dependency injection.
#[async_trait]
pub trait TrackingService: Send + Sync {
    /// All rows, empty when the sheet was never written
    async fn items(&self) -> AppResult<Vec<TrackingItem>>;

    /// Append a row with a freshly assigned key
    async fn add_item(&self, body: Value) -> AppResult<TrackingItem>;

    /// Merge the body into a row. Returns `None` when nothing changed.
    async fn update_item(&self, item_id: &str, body: Value) -> AppResult<Option<TrackingItem>>;

    /// Remove a row, returning its key
    async fn delete_item(&self, item_id: &str) -> AppResult<Uuid>;
}

/// Concrete implementation of TrackingService.
pub struct TrackingManager {
    store: Arc<dyn DocumentStore>,
}

impl TrackingManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TrackingService for TrackingManager {
    async fn items(&self) -> AppResult<Vec<TrackingItem>> {
        let sheet: TrackingDocument =
            document_ops::load_singleton(self.store.as_ref(), COLLECTION_PROJECT_TRACKING).await?;
        tracing::debug!(items = sheet.items.len(), "Loaded project tracking");
        Ok(sheet.items)
    }

    async fn add_item(&self, body: Value) -> AppResult<TrackingItem> {
        let item = TrackingItem::from_request(body)?;
        let target = Target::singleton(COLLECTION_PROJECT_TRACKING, ITEM).or_create();

        document_ops::modify(self.store.as_ref(), target, |sheet: &mut TrackingDocument| {
            sheet.add_item(item.clone());
            Ok(Mutation::Changed(()))
        })
        .await?;

        tracing::info!(item_key = %item.key, "Project tracking item added");
        Ok(item)
    }

    async fn update_item(&self, item_id: &str, body: Value) -> AppResult<Option<TrackingItem>> {
        let key = parse_row_key(item_id, RowAction::Update)?;
        let mut patch = domain_fields::require_object(body, "item")?;
        normalize_fields(&mut patch, Coercion::Lenient)?;
        let patch = Value::Object(patch);

        let target = Target::singleton(COLLECTION_PROJECT_TRACKING, ITEM);
        let (updated, _) =
            document_ops::modify(self.store.as_ref(), target, |sheet: &mut TrackingDocument| {
                Ok(match sheet.update_item(key, patch.clone())? {
                    Some(item) => Mutation::Changed(Some(item)),
                    None => Mutation::Unchanged(None),
                })
            })
            .await?;

        match &updated {
            Some(_) => tracing::info!(item_key = %key, "Project tracking item updated"),
            None => tracing::debug!(item_key = %key, "Project tracking item already up to date"),
        }
        Ok(updated)
    }

    async fn delete_item(&self, item_id: &str) -> AppResult<Uuid> {
        let key = parse_row_key(item_id, RowAction::Delete)?;
        let target = Target::singleton(COLLECTION_PROJECT_TRACKING, ITEM);

        document_ops::modify(self.store.as_ref(), target, |sheet: &mut TrackingDocument| {
            sheet.remove_item(key)?;
            Ok(Mutation::Changed(()))
        })
        .await?;

        tracing::info!(item_key = %key, "Project tracking item deleted");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use serde_json::json;

    fn manager() -> TrackingManager {
        TrackingManager::new(Arc::new(MemoryStore::new()))
    }

    fn row() -> Value {
        json!({"projectWork": "Portal", "devName": "Sam", "salary": 1000, "startDate": "01/03/2024"})
    }

    #[tokio::test]
    async fn test_missing_required_field_never_touches_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        store.expect_insert().never();
        let manager = TrackingManager::new(Arc::new(store));

        let err = manager.add_item(json!({"devName": "Sam"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Missing required field 'projectWork'"));
    }

    #[tokio::test]
    async fn test_temporary_ids_never_touch_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_find().never();
        let manager = TrackingManager::new(Arc::new(store));

        let err = manager.update_item("temp_42", json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = manager.delete_item("new_42").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_coerces_and_reports_no_change() {
        let manager = manager();
        let item = manager.add_item(row()).await.unwrap();
        let id = item.key.to_string();

        let updated = manager
            .update_item(&id, json!({"salary": "oops", "endedDate": "15/03/2024"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.salary, Some(0.0));
        assert!(updated.ended_date.is_some());

        let unchanged = manager.update_item(&id, json!({"devName": "Sam"})).await.unwrap();
        assert!(unchanged.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_date() {
        let manager = manager();
        let item = manager.add_item(row()).await.unwrap();

        let err = manager
            .update_item(&item.key.to_string(), json!({"startDate": "March"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Invalid startDate format. Use DD/MM/YYYY"));
    }

    #[tokio::test]
    async fn test_delete_unknown_row_is_not_found() {
        let manager = manager();
        let kept = manager.add_item(row()).await.unwrap();
        let gone = manager.add_item(row()).await.unwrap();

        assert_eq!(manager.delete_item(&gone.key.to_string()).await.unwrap(), gone.key);
        let err = manager.delete_item(&gone.key.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(entity) if entity == "Item"));

        let items = manager.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, kept.key);
    }
}
