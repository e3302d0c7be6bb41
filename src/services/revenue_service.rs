//! Subscription revenue service - Projected revenue lines keyed by client id.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use domain::{SubscriptionRevenue, RECORD_ID_FIELD};

use super::document_ops::{self, Mutation, Target};
use crate::config::COLLECTION_SUBSCRIPTION_REVENUE;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Document, DocumentStore, SortOrder};
use crate::types::Record;

const ITEM: &str = "Item";

/// Subscription revenue service trait for dependency injection.
#[async_trait]
pub trait RevenueService: Send + Sync {
    async fn list_revenue(&self) -> AppResult<Vec<Record<SubscriptionRevenue>>>;

    /// Create a line; the annual figure is derived when absent
    async fn create_revenue(&self, body: Value) -> AppResult<Record<SubscriptionRevenue>>;

    /// Merge the body into the line with the given client id
    async fn update_revenue(&self, id: &str, body: Value) -> AppResult<Record<SubscriptionRevenue>>;

    async fn delete_revenue(&self, id: &str) -> AppResult<()>;

    /// Replace every line with the `items` of the body
    async fn bulk_replace(&self, body: Value) -> AppResult<Vec<Record<SubscriptionRevenue>>>;
}

/// Concrete implementation of RevenueService.
pub struct RevenueManager {
    store: Arc<dyn DocumentStore>,
}

impl RevenueManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find(&self, id: &str) -> AppResult<Document> {
        self.store
            .find_by_field(COLLECTION_SUBSCRIPTION_REVENUE, RECORD_ID_FIELD, id)
            .await?
            .ok_or_not_found(ITEM)
    }
}

/// Pull the `items` array out of a bulk request body.
pub(crate) fn bulk_items(body: Value, message: &str) -> AppResult<Vec<Value>> {
    match body {
        Value::Object(mut fields) => match fields.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(AppError::validation(message)),
        },
        _ => Err(AppError::validation(message)),
    }
}

#[async_trait]
impl RevenueService for RevenueManager {
    async fn list_revenue(&self) -> AppResult<Vec<Record<SubscriptionRevenue>>> {
        let documents = self
            .store
            .list(COLLECTION_SUBSCRIPTION_REVENUE, SortOrder::Oldest)
            .await?;
        Record::from_documents(&documents)
    }

    async fn create_revenue(&self, body: Value) -> AppResult<Record<SubscriptionRevenue>> {
        let revenue = SubscriptionRevenue::from_request(body)?;

        let document = self
            .store
            .insert(
                COLLECTION_SUBSCRIPTION_REVENUE,
                Uuid::new_v4(),
                document_ops::encode(&revenue)?,
            )
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Revenue item with id '{}' already exists", revenue.id))
            })?;

        tracing::info!(revenue_id = %revenue.id, "Subscription revenue created");
        Record::from_document(&document)
    }

    async fn update_revenue(&self, id: &str, body: Value) -> AppResult<Record<SubscriptionRevenue>> {
        SubscriptionRevenue::validate_patch(&body)?;
        let existing = self.find(id).await?;
        let target = Target::document(COLLECTION_SUBSCRIPTION_REVENUE, existing.key, ITEM);

        let (_, document) = document_ops::modify(
            self.store.as_ref(),
            target,
            |revenue: &mut SubscriptionRevenue| {
                *revenue = revenue.merged(body.clone())?;
                Ok(Mutation::Changed(()))
            },
        )
        .await?;

        tracing::info!(revenue_id = id, "Subscription revenue updated");
        Record::from_document(&document.ok_or_not_found(ITEM)?)
    }

    async fn delete_revenue(&self, id: &str) -> AppResult<()> {
        let existing = self.find(id).await?;
        if !self
            .store
            .delete(COLLECTION_SUBSCRIPTION_REVENUE, existing.key)
            .await?
        {
            return Err(AppError::not_found(ITEM));
        }
        tracing::info!(revenue_id = id, "Subscription revenue deleted");
        Ok(())
    }

    async fn bulk_replace(&self, body: Value) -> AppResult<Vec<Record<SubscriptionRevenue>>> {
        let items = bulk_items(body, "Items must be an array")?;
        let bodies = items
            .into_iter()
            .map(|item| {
                let revenue = SubscriptionRevenue::from_request(item)?;
                document_ops::encode(&revenue)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let documents = self
            .store
            .replace_all(COLLECTION_SUBSCRIPTION_REVENUE, bodies)
            .await?;
        tracing::info!(count = documents.len(), "Subscription revenue replaced");
        Record::from_documents(&documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use serde_json::json;

    fn manager() -> RevenueManager {
        RevenueManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_derives_annual_revenue() {
        let record = manager()
            .create_revenue(json!({"id": "r1", "projectedMonthlyRevenue": 100}))
            .await
            .unwrap();
        assert_eq!(record.data.projected_annual_revenue, 1200.0);
        assert_eq!(record.data.revenue_source, "New Revenue Source");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let manager = manager();
        manager.create_revenue(json!({"id": "r1"})).await.unwrap();
        let err = manager.create_revenue(json!({"id": "r1"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_body_never_touches_storage() {
        let mut store = MockDocumentStore::new();
        store.expect_insert().never();
        let manager = RevenueManager::new(Arc::new(store));

        let err = manager
            .create_revenue(json!({"id": "r1", "subscribed": -3}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_before_lookup() {
        let mut store = MockDocumentStore::new();
        store.expect_find_by_field().never();
        store.expect_find().never();
        let manager = RevenueManager::new(Arc::new(store));

        let err = manager.update_revenue("ghost", json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = manager
            .update_revenue("ghost", json!({"subscribed": -5}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "subscribed must be greater than or equal to 0"));
    }

    #[tokio::test]
    async fn test_update_with_blank_monthly_zeroes_annual() {
        let manager = manager();
        manager
            .create_revenue(json!({"id": "r1", "projectedMonthlyRevenue": 100}))
            .await
            .unwrap();

        let record = manager
            .update_revenue("r1", json!({"projectedMonthlyRevenue": ""}))
            .await
            .unwrap();
        assert_eq!(record.data.projected_monthly_revenue, 0.0);
        assert_eq!(record.data.projected_annual_revenue, 0.0);
    }

    #[tokio::test]
    async fn test_update_without_annual_derives_it() {
        let manager = manager();
        manager
            .create_revenue(json!({"id": "r1", "projectedMonthlyRevenue": 100, "projectedAnnualRevenue": 5000}))
            .await
            .unwrap();

        let record = manager
            .update_revenue("r1", json!({"projectedMonthlyRevenue": 300}))
            .await
            .unwrap();
        assert_eq!(record.data.projected_annual_revenue, 3600.0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let manager = manager();
        let err = manager.update_revenue("ghost", json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = manager.delete_revenue("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bulk_replace() {
        let manager = manager();
        manager.create_revenue(json!({"id": "old"})).await.unwrap();

        let err = manager.bulk_replace(json!({"items": "nope"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Items must be an array"));

        let records = manager
            .bulk_replace(json!({"items": [{"id": "a", "projectedMonthlyRevenue": 10}, {"id": "b"}]}))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data.projected_annual_revenue, 120.0);

        let ids: Vec<String> = manager
            .list_revenue()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
