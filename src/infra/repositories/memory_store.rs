//! In-process document store.
//!
//! Backs `serve --in-memory` and the test suites. Mirrors the versioning and
//! unique-id rules of the PostgreSQL store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::document_repository::{Document, DocumentStore, SortOrder};
use crate::config::has_unique_ids;
use crate::errors::{AppError, AppResult};

#[derive(Default)]
struct Inner {
    next_seq: i64,
    /// Documents with their insertion sequence, oldest first
    rows: Vec<(i64, Document)>,
}

impl Inner {
    fn client_id(body: &Value) -> Option<&str> {
        body.get("id").and_then(Value::as_str)
    }

    fn id_taken(&self, collection: &str, body: &Value, except: Option<Uuid>) -> bool {
        if !has_unique_ids(collection) {
            return false;
        }
        let Some(id) = Self::client_id(body) else {
            return false;
        };
        self.rows.iter().any(|(_, doc)| {
            doc.collection == collection
                && Some(doc.key) != except
                && Self::client_id(&doc.body) == Some(id)
        })
    }

    fn push(&mut self, collection: &str, key: Uuid, body: Value) -> Document {
        let now = Utc::now();
        let document = Document {
            key,
            collection: collection.to_string(),
            body,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.next_seq += 1;
        self.rows.push((self.next_seq, document.clone()));
        document
    }
}

/// Document store kept in process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, key: Uuid) -> AppResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .map(|(_, doc)| doc)
            .find(|doc| doc.collection == collection && doc.key == key)
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .map(|(_, doc)| doc)
            .find(|doc| {
                doc.collection == collection
                    && doc.body.get(field).and_then(Value::as_str) == Some(value)
            })
            .cloned())
    }

    async fn list(&self, collection: &str, order: SortOrder) -> AppResult<Vec<Document>> {
        let inner = self.inner.read().await;
        let mut documents: Vec<Document> = inner
            .rows
            .iter()
            .filter(|(_, doc)| doc.collection == collection)
            .map(|(_, doc)| doc.clone())
            .collect();
        if order == SortOrder::Newest {
            documents.reverse();
        }
        Ok(documents)
    }

    async fn insert(&self, collection: &str, key: Uuid, body: Value) -> AppResult<Option<Document>> {
        let mut inner = self.inner.write().await;
        let key_taken = inner.rows.iter().any(|(_, doc)| doc.key == key);
        if key_taken || inner.id_taken(collection, &body, None) {
            return Ok(None);
        }
        Ok(Some(inner.push(collection, key, body)))
    }

    async fn replace(
        &self,
        collection: &str,
        key: Uuid,
        body: Value,
        expected_version: i32,
    ) -> AppResult<Option<Document>> {
        let mut inner = self.inner.write().await;
        if inner.id_taken(collection, &body, Some(key)) {
            return Err(AppError::validation("Duplicate id"));
        }

        let Some((_, doc)) = inner.rows.iter_mut().find(|(_, doc)| {
            doc.collection == collection && doc.key == key && doc.version == expected_version
        }) else {
            return Ok(None);
        };

        doc.body = body;
        doc.version += 1;
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, key: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner
            .rows
            .retain(|(_, doc)| !(doc.collection == collection && doc.key == key));
        Ok(inner.rows.len() != before)
    }

    async fn replace_all(&self, collection: &str, bodies: Vec<Value>) -> AppResult<Vec<Document>> {
        let mut inner = self.inner.write().await;

        let mut staged = Inner::default();
        for body in bodies {
            if staged.id_taken(collection, &body, None) {
                return Err(AppError::validation("Duplicate id in items"));
            }
            staged.push(collection, Uuid::new_v4(), body);
        }

        inner.rows.retain(|(_, doc)| doc.collection != collection);
        let mut documents = Vec::with_capacity(staged.rows.len());
        for (_, doc) in staged.rows {
            inner.next_seq += 1;
            let seq = inner.next_seq;
            documents.push(doc.clone());
            inner.rows.push((seq, doc));
        }
        Ok(documents)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
