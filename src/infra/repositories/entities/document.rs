//! Stored document entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::infra::repositories::Document;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collection: String,
    /// Insertion order within a collection
    pub seq: i64,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    /// Bumped on every write, guards concurrent updates
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Document {
    fn from(model: Model) -> Self {
        Document {
            key: model.id,
            collection: model.collection,
            body: model.body,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
