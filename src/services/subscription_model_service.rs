//! Subscription model service - Subscription plans keyed by client id.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use domain::{SubscriptionModel, RECORD_ID_FIELD};

use super::document_ops::{self, Mutation, Target};
use super::revenue_service::bulk_items;
use crate::config::COLLECTION_SUBSCRIPTION_MODELS;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Document, DocumentStore, SortOrder};
use crate::types::Record;

const MODEL: &str = "Subscription model";

/// Subscription model service trait for dependency injection.
#[async_trait]
pub trait SubscriptionModelService: Send + Sync {
    /// All plans, newest first
    async fn list_models(&self) -> AppResult<Vec<Record<SubscriptionModel>>>;

    async fn create_model(&self, body: Value) -> AppResult<Record<SubscriptionModel>>;

    async fn get_model(&self, id: &str) -> AppResult<Record<SubscriptionModel>>;

    /// Update the revenue fields of a plan
    async fn update_model(&self, id: &str, body: Value) -> AppResult<Record<SubscriptionModel>>;

    async fn delete_model(&self, id: &str) -> AppResult<()>;

    /// Replace every plan, filling in defaults
    async fn bulk_replace(&self, body: Value) -> AppResult<Vec<Record<SubscriptionModel>>>;
}

/// Concrete implementation of SubscriptionModelService.
pub struct SubscriptionModelManager {
    store: Arc<dyn DocumentStore>,
}

impl SubscriptionModelManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn find(&self, id: &str) -> AppResult<Option<Document>> {
        self.store
            .find_by_field(COLLECTION_SUBSCRIPTION_MODELS, RECORD_ID_FIELD, id)
            .await
    }
}

#[async_trait]
impl SubscriptionModelService for SubscriptionModelManager {
    async fn list_models(&self) -> AppResult<Vec<Record<SubscriptionModel>>> {
        let documents = self
            .store
            .list(COLLECTION_SUBSCRIPTION_MODELS, SortOrder::Newest)
            .await?;
        Record::from_documents(&documents)
    }

    async fn create_model(&self, body: Value) -> AppResult<Record<SubscriptionModel>> {
        let model = SubscriptionModel::from_request(body)?;

        let document = self
            .store
            .insert(
                COLLECTION_SUBSCRIPTION_MODELS,
                Uuid::new_v4(),
                document_ops::encode(&model)?,
            )
            .await?
            .ok_or_else(|| AppError::validation("Subscription model with this ID already exists"))?;

        tracing::info!(model_id = %model.id, "Subscription model created");
        Record::from_document(&document)
    }

    async fn get_model(&self, id: &str) -> AppResult<Record<SubscriptionModel>> {
        let document = self.find(id).await?.ok_or_not_found(MODEL)?;
        Record::from_document(&document)
    }

    async fn update_model(&self, id: &str, body: Value) -> AppResult<Record<SubscriptionModel>> {
        SubscriptionModel::validate_patch(&body)?;
        let existing = self.find(id).await?.ok_or_not_found("Subscription item")?;
        let target = Target::document(COLLECTION_SUBSCRIPTION_MODELS, existing.key, "Subscription item");

        let (_, document) = document_ops::modify(
            self.store.as_ref(),
            target,
            |model: &mut SubscriptionModel| {
                *model = model.apply_patch(body.clone())?;
                Ok(Mutation::Changed(()))
            },
        )
        .await?;

        tracing::info!(model_id = id, "Subscription model updated");
        Record::from_document(&document.ok_or_not_found("Subscription item")?)
    }

    async fn delete_model(&self, id: &str) -> AppResult<()> {
        let existing = self.find(id).await?.ok_or_not_found(MODEL)?;
        if !self
            .store
            .delete(COLLECTION_SUBSCRIPTION_MODELS, existing.key)
            .await?
        {
            return Err(AppError::not_found(MODEL));
        }
        tracing::info!(model_id = id, "Subscription model deleted");
        Ok(())
    }

    async fn bulk_replace(&self, body: Value) -> AppResult<Vec<Record<SubscriptionModel>>> {
        let items = bulk_items(body, "Request body must contain an 'items' array")?;
        let now = Utc::now();
        let bodies = items
            .into_iter()
            .map(|item| {
                let model = SubscriptionModel::with_bulk_defaults(item, now)?;
                document_ops::encode(&model)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let documents = self
            .store
            .replace_all(COLLECTION_SUBSCRIPTION_MODELS, bodies)
            .await?;
        tracing::info!(count = documents.len(), "Subscription models replaced");
        Record::from_documents(&documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use serde_json::json;

    fn manager() -> SubscriptionModelManager {
        SubscriptionModelManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let manager = manager();
        manager.create_model(json!({"id": "m1"})).await.unwrap();
        manager.create_model(json!({"id": "m2"})).await.unwrap();

        let ids: Vec<String> = manager
            .list_models()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.id)
            .collect();
        assert_eq!(ids, vec!["m2", "m1"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_message() {
        let manager = manager();
        manager.create_model(json!({"id": "m1"})).await.unwrap();
        let err = manager.create_model(json!({"id": "m1"})).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Subscription model with this ID already exists"));
    }

    #[tokio::test]
    async fn test_not_found_messages() {
        let manager = manager();
        let err = manager.get_model("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Subscription model not found");
        let err = manager.update_model("ghost", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Subscription item not found");
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_before_lookup() {
        let mut store = MockDocumentStore::new();
        store.expect_find_by_field().never();
        store.expect_find().never();
        let manager = SubscriptionModelManager::new(Arc::new(store));

        let err = manager.update_model("ghost", json!(5)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_derives_annual() {
        let manager = manager();
        manager.create_model(json!({"id": "m1", "solpType": "Retail"})).await.unwrap();

        let record = manager
            .update_model("m1", json!({"projectedMonthlyRevenue": 50, "solpType": "Online"}))
            .await
            .unwrap();
        assert_eq!(record.data.projected_annual_revenue, Some(600.0));
        assert_eq!(record.data.solp_type.as_deref(), Some("Retail"));
    }

    #[tokio::test]
    async fn test_bulk_fills_defaults() {
        let manager = manager();
        let err = manager.bulk_replace(json!([])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Request body must contain an 'items' array"));

        let records = manager
            .bulk_replace(json!({"items": [{"revenueSource": "Gold"}, {"id": "m9"}]}))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data.revenue_source.as_deref(), Some("Gold"));
        assert_eq!(records[0].data.solp_type.as_deref(), Some("Online"));
        assert!(records[0].data.get_subscription_date.is_some());
        assert_eq!(records[1].data.id, "m9");
    }
}
