use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser,
    m20261018_000003_create_property_table::Property, m20261018_000005_create_lease_table::Lease,
};

static IDX_DOCUMENT_PROPERTY_ID: &str = "idx_document_property_id";
static IDX_DOCUMENT_LEASE_ID: &str = "idx_document_lease_id";
static FK_DOCUMENT_PROPERTY_ID: &str = "fk_document_property_id";
static FK_DOCUMENT_LEASE_ID: &str = "fk_document_lease_id";
static FK_DOCUMENT_UPLOADED_BY: &str = "fk_document_uploaded_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(pk_auto(Document::Id))
                    .col(integer(Document::PropertyId))
                    .col(integer_null(Document::LeaseId))
                    .col(integer(Document::UploadedBy))
                    .col(string(Document::Title))
                    .col(text(Document::Category))
                    .col(string(Document::FileName))
                    .col(string(Document::StorageKey))
                    .col(string(Document::ContentType))
                    .col(big_integer(Document::SizeBytes))
                    .col(integer(Document::Version))
                    .col(json(Document::Metadata))
                    .col(timestamp(Document::CreatedAt))
                    .col(timestamp(Document::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DOCUMENT_PROPERTY_ID)
                            .from(Document::Table, Document::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DOCUMENT_LEASE_ID)
                            .from(Document::Table, Document::LeaseId)
                            .to(Lease::Table, Lease::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DOCUMENT_UPLOADED_BY)
                            .from(Document::Table, Document::UploadedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DOCUMENT_PROPERTY_ID)
                    .table(Document::Table)
                    .col(Document::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DOCUMENT_LEASE_ID)
                    .table(Document::Table)
                    .col(Document::LeaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Document {
    Table,
    Id,
    PropertyId,
    LeaseId,
    UploadedBy,
    Title,
    Category,
    FileName,
    StorageKey,
    ContentType,
    SizeBytes,
    Version,
    Metadata,
    CreatedAt,
    UpdatedAt,
}
