//! Document store: JSON documents grouped into collections.
//!
//! Every write that replaces a document is conditioned on the version that
//! was read, so two writers racing on the same document cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, Order, QueryFilter, QueryOrder, Set, SqlErr, Statement, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use super::entities::document::{self, ActiveModel, Entity as DocumentEntity};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A stored document with its bookkeeping columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: Uuid,
    pub collection: String,
    pub body: Value,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing order, by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Oldest,
    Newest,
}

/// Deterministic key of the one document a singleton collection holds.
pub fn singleton_key(collection: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, collection.as_bytes())
}

/// Document store trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find a document by key
    async fn find(&self, collection: &str, key: Uuid) -> AppResult<Option<Document>>;

    /// Find the first document whose top-level `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Option<Document>>;

    /// List every document of a collection
    async fn list(&self, collection: &str, order: SortOrder) -> AppResult<Vec<Document>>;

    /// Insert a new document. Returns `None` when the key or a unique id is taken.
    async fn insert(&self, collection: &str, key: Uuid, body: Value) -> AppResult<Option<Document>>;

    /// Replace a document body if it is still at `expected_version`.
    ///
    /// Returns `None` when the document changed or disappeared in the meantime.
    async fn replace(
        &self,
        collection: &str,
        key: Uuid,
        body: Value,
        expected_version: i32,
    ) -> AppResult<Option<Document>>;

    /// Delete a document. Returns whether it existed.
    async fn delete(&self, collection: &str, key: Uuid) -> AppResult<bool>;

    /// Atomically swap the whole collection for new documents
    async fn replace_all(&self, collection: &str, bodies: Vec<Value>) -> AppResult<Vec<Document>>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// PostgreSQL implementation of DocumentStore
pub struct PgDocumentStore {
    db: DatabaseConnection,
}

impl PgDocumentStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn new_row(collection: &str, key: Uuid, body: Value, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: Set(key),
            collection: Set(collection.to_string()),
            seq: NotSet,
            body: Set(body),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    async fn swap_collection<C: ConnectionTrait>(
        conn: &C,
        collection: &str,
        bodies: Vec<Value>,
    ) -> Result<Vec<Document>, DbErr> {
        DocumentEntity::delete_many()
            .filter(document::Column::Collection.eq(collection))
            .exec(conn)
            .await?;

        if !bodies.is_empty() {
            let now = Utc::now();
            let rows = bodies
                .into_iter()
                .map(|body| Self::new_row(collection, Uuid::new_v4(), body, now));
            DocumentEntity::insert_many(rows).exec(conn).await?;
        }

        let models = DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by(document::Column::Seq, Order::Asc)
            .all(conn)
            .await?;

        Ok(models.into_iter().map(Document::from).collect())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: &str, key: Uuid) -> AppResult<Option<Document>> {
        let result = DocumentEntity::find_by_id(key)
            .filter(document::Column::Collection.eq(collection))
            .one(&self.db)
            .await?;

        Ok(result.map(Document::from))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Option<Document>> {
        let result = DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection))
            .filter(Expr::cust_with_values("body ->> ? = ?", [field, value]))
            .order_by(document::Column::Seq, Order::Asc)
            .one(&self.db)
            .await?;

        Ok(result.map(Document::from))
    }

    async fn list(&self, collection: &str, order: SortOrder) -> AppResult<Vec<Document>> {
        let order = match order {
            SortOrder::Oldest => Order::Asc,
            SortOrder::Newest => Order::Desc,
        };

        let models = DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by(document::Column::Seq, order)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Document::from).collect())
    }

    async fn insert(&self, collection: &str, key: Uuid, body: Value) -> AppResult<Option<Document>> {
        match Self::new_row(collection, key, body, Utc::now())
            .insert(&self.db)
            .await
        {
            Ok(model) => Ok(Some(Document::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn replace(
        &self,
        collection: &str,
        key: Uuid,
        body: Value,
        expected_version: i32,
    ) -> AppResult<Option<Document>> {
        let updated = DocumentEntity::update_many()
            .col_expr(document::Column::Body, Expr::value(body))
            .col_expr(
                document::Column::Version,
                Expr::col(document::Column::Version).add(1),
            )
            .col_expr(document::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(document::Column::Id.eq(key))
            .filter(document::Column::Collection.eq(collection))
            .filter(document::Column::Version.eq(expected_version))
            .exec_with_returning(&self.db)
            .await?;

        Ok(updated.into_iter().next().map(Document::from))
    }

    async fn delete(&self, collection: &str, key: Uuid) -> AppResult<bool> {
        let result = DocumentEntity::delete_many()
            .filter(document::Column::Id.eq(key))
            .filter(document::Column::Collection.eq(collection))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn replace_all(&self, collection: &str, bodies: Vec<Value>) -> AppResult<Vec<Document>> {
        let txn = self.db.begin().await?;

        match Self::swap_collection(&txn, collection, bodies).await {
            Ok(documents) => {
                txn.commit().await?;
                Ok(documents)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                if is_unique_violation(&e) {
                    return Err(AppError::validation("Duplicate id in items"));
                }
                Err(AppError::from(e))
            }
        }
    }

    async fn ping(&self) -> AppResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_key_is_stable_per_collection() {
        assert_eq!(singleton_key("budget"), singleton_key("budget"));
        assert_ne!(singleton_key("budget"), singleton_key("financial_summary"));
    }
}
