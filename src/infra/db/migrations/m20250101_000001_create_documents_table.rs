//! Migration: Create the documents table.

use sea_orm_migration::prelude::*;

use crate::config::UNIQUE_ID_COLLECTIONS;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::Collection).string().not_null())
                    .col(
                        ColumnDef::new(Documents::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Documents::Body).json_binary().not_null())
                    .col(
                        ColumnDef::new(Documents::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Documents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Documents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_collection_seq")
                    .table(Documents::Table)
                    .col(Documents::Collection)
                    .col(Documents::Seq)
                    .to_owned(),
            )
            .await?;

        // Client ids of subscription records are unique per collection.
        let collections = UNIQUE_ID_COLLECTIONS
            .iter()
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>()
            .join(", ");
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_client_id \
                 ON documents (collection, (body ->> 'id')) \
                 WHERE collection IN ({})",
                collections
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Documents {
    Table,
    Id,
    Collection,
    Seq,
    Body,
    Version,
    CreatedAt,
    UpdatedAt,
}
