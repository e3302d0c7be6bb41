//! Typed read-modify-write on stored documents.
//!
//! A write is conditioned on the version that was read. When another writer
//! got there first, the document is read again and the change re-applied.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::MAX_WRITE_ATTEMPTS;
use crate::errors::{AppError, AppResult};
use crate::infra::{singleton_key, Document, DocumentStore};

/// Outcome of applying a change to a document.
pub enum Mutation<R> {
    /// The document changed and must be written back.
    Changed(R),
    /// Nothing changed; skip the write.
    Unchanged(R),
}

/// Which document a read-modify-write targets.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub collection: &'a str,
    pub key: Uuid,
    /// Name used in "not found" errors
    pub entity: &'a str,
    /// Create an empty document when it does not exist yet
    pub create_missing: bool,
}

impl<'a> Target<'a> {
    /// The one document of a singleton collection.
    pub fn singleton(collection: &'a str, entity: &'a str) -> Self {
        Self {
            collection,
            key: singleton_key(collection),
            entity,
            create_missing: false,
        }
    }

    /// An independent document addressed by key.
    pub fn document(collection: &'a str, key: Uuid, entity: &'a str) -> Self {
        Self {
            collection,
            key,
            entity,
            create_missing: false,
        }
    }

    pub fn or_create(mut self) -> Self {
        self.create_missing = true;
        self
    }
}

/// Parse the storage key of an independent document from a path segment.
pub fn parse_key(id: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request(format!("Invalid {} ID format", entity)))
}

/// Decode a stored document body into its typed form.
pub fn decode<T: DeserializeOwned>(document: &Document) -> AppResult<T> {
    serde_json::from_value(document.body.clone()).map_err(|e| {
        AppError::internal(format!(
            "Stored {} document {} is malformed: {}",
            document.collection, document.key, e
        ))
    })
}

/// Encode a typed record as a document body.
pub fn encode<T: Serialize>(record: &T) -> AppResult<Value> {
    serde_json::to_value(record).map_err(|e| AppError::internal(e.to_string()))
}

/// Load a singleton document, or its default when it was never written.
pub async fn load_singleton<T>(store: &dyn DocumentStore, collection: &str) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.find(collection, singleton_key(collection)).await? {
        Some(document) => decode(&document),
        None => Ok(T::default()),
    }
}

async fn read<T>(store: &dyn DocumentStore, target: &Target<'_>) -> AppResult<(T, Option<Document>)>
where
    T: DeserializeOwned + Default,
{
    match store.find(target.collection, target.key).await? {
        Some(document) => Ok((decode(&document)?, Some(document))),
        None if target.create_missing => Ok((T::default(), None)),
        None => Err(AppError::not_found(target.entity)),
    }
}

/// Apply `change` to the targeted document and persist the result.
///
/// `change` may run more than once, so it must only touch the record it is
/// given. Returns its result together with the stored document.
pub async fn modify<T, R, F>(
    store: &dyn DocumentStore,
    target: Target<'_>,
    mut change: F,
) -> AppResult<(R, Option<Document>)>
where
    T: Serialize + DeserializeOwned + Default + Send,
    R: Send,
    F: FnMut(&mut T) -> AppResult<Mutation<R>> + Send,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let (mut record, current) = read::<T>(store, &target).await?;

        let result = match change(&mut record)? {
            Mutation::Unchanged(result) => return Ok((result, current)),
            Mutation::Changed(result) => result,
        };

        let body = encode(&record)?;
        let written = match &current {
            Some(document) => {
                store
                    .replace(target.collection, target.key, body, document.version)
                    .await?
            }
            None => store.insert(target.collection, target.key, body).await?,
        };

        if let Some(document) = written {
            return Ok((result, Some(document)));
        }

        tracing::debug!(
            collection = target.collection,
            key = %target.key,
            attempt,
            "Document changed concurrently, retrying"
        );
    }

    Err(AppError::conflict(format!(
        "{} was modified concurrently, please retry",
        target.entity
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryStore, MockDocumentStore};
    use chrono::Utc;
    use domain::BudgetDocument;
    use serde_json::json;

    fn stored(collection: &str, body: Value, version: i32) -> Document {
        Document {
            key: singleton_key(collection),
            collection: collection.to_string(),
            body,
            version,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let result = modify::<BudgetDocument, (), _>(
            &store,
            Target::singleton("budget", "Budget"),
            |_| Ok(Mutation::Changed(())),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Budget"));
    }

    #[tokio::test]
    async fn test_unchanged_skips_write() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .returning(|c, _| Ok(Some(stored(c, json!({"sections": []}), 1))));
        store.expect_replace().never();

        let (result, _) = modify::<BudgetDocument, _, _>(
            &store,
            Target::singleton("budget", "Budget"),
            |_| Ok(Mutation::Unchanged(7)),
        )
        .await
        .unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test]
    async fn test_stale_version_is_retried_on_fresh_read() {
        let mut store = MockDocumentStore::new();
        let mut reads = 0;
        store.expect_find().times(2).returning(move |c, _| {
            reads += 1;
            Ok(Some(stored(c, json!({"sections": []}), reads)))
        });
        store
            .expect_replace()
            .withf(|_, _, _, version| *version == 1)
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        store
            .expect_replace()
            .withf(|_, _, _, version| *version == 2)
            .times(1)
            .returning(|c, _, body, _| Ok(Some(stored(c, body, 3))));

        let mut applied = 0;
        let (_, document) = modify::<BudgetDocument, _, _>(
            &store,
            Target::singleton("budget", "Budget"),
            |_| {
                applied += 1;
                Ok(Mutation::Changed(()))
            },
        )
        .await
        .unwrap();

        assert_eq!(applied, 2);
        assert_eq!(document.unwrap().version, 3);
    }

    #[tokio::test]
    async fn test_persistent_contention_is_a_conflict() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .times(MAX_WRITE_ATTEMPTS)
            .returning(|c, _| Ok(Some(stored(c, json!({}), 1))));
        store
            .expect_replace()
            .times(MAX_WRITE_ATTEMPTS)
            .returning(|_, _, _, _| Ok(None));

        let result = modify::<BudgetDocument, (), _>(
            &store,
            Target::singleton("budget", "Budget"),
            |_| Ok(Mutation::Changed(())),
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_missing_inserts() {
        let store = MemoryStore::new();
        let (_, document) = modify::<BudgetDocument, _, _>(
            &store,
            Target::singleton("budget", "Budget").or_create(),
            |doc| {
                doc.sections.push(domain::BudgetSection::new("s1", "Ops"));
                Ok(Mutation::Changed(()))
            },
        )
        .await
        .unwrap();

        let document = document.unwrap();
        assert_eq!(document.version, 1);
        assert_eq!(document.body["sections"][0]["id"], json!("s1"));
    }
}
