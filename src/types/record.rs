//! Stored records as returned by the API.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::infra::Document;
use crate::services::document_ops;

/// A typed document body together with its storage key and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub key: Uuid,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DeserializeOwned> Record<T> {
    pub fn from_document(document: &Document) -> AppResult<Self> {
        Ok(Self {
            key: document.key,
            data: document_ops::decode(document)?,
            created_at: document.created_at,
            updated_at: document.updated_at,
        })
    }

    pub fn from_documents(documents: &[Document]) -> AppResult<Vec<Self>> {
        documents.iter().map(Self::from_document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::SubscriptionRevenue;
    use serde_json::json;

    #[test]
    fn test_record_flattens_body() {
        let now = Utc::now();
        let document = Document {
            key: Uuid::new_v4(),
            collection: "subscription_revenue".to_string(),
            body: json!({"id": "r1", "revenueSource": "Ads"}),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let record = Record::<SubscriptionRevenue>::from_document(&document).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["_id"], json!(document.key.to_string()));
        assert_eq!(value["id"], json!("r1"));
        assert_eq!(value["revenueSource"], json!("Ads"));
        assert!(value.get("createdAt").is_some());
    }
}
