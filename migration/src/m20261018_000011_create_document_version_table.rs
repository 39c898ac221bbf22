use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser,
    m20261018_000010_create_document_table::Document,
};

static IDX_DOCUMENT_VERSION_DOCUMENT_ID: &str = "idx_document_version_document_id_version";
static FK_DOCUMENT_VERSION_DOCUMENT_ID: &str = "fk_document_version_document_id";
static FK_DOCUMENT_VERSION_UPLOADED_BY: &str = "fk_document_version_uploaded_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentVersion::Table)
                    .if_not_exists()
                    .col(pk_auto(DocumentVersion::Id))
                    .col(integer(DocumentVersion::DocumentId))
                    .col(integer(DocumentVersion::Version))
                    .col(string(DocumentVersion::FileName))
                    .col(string(DocumentVersion::StorageKey))
                    .col(string(DocumentVersion::ContentType))
                    .col(big_integer(DocumentVersion::SizeBytes))
                    .col(integer(DocumentVersion::UploadedBy))
                    .col(timestamp(DocumentVersion::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DOCUMENT_VERSION_DOCUMENT_ID)
                            .from(DocumentVersion::Table, DocumentVersion::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_DOCUMENT_VERSION_UPLOADED_BY)
                            .from(DocumentVersion::Table, DocumentVersion::UploadedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DOCUMENT_VERSION_DOCUMENT_ID)
                    .table(DocumentVersion::Table)
                    .col(DocumentVersion::DocumentId)
                    .col(DocumentVersion::Version)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentVersion::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DocumentVersion {
    Table,
    Id,
    DocumentId,
    Version,
    FileName,
    StorageKey,
    ContentType,
    SizeBytes,
    UploadedBy,
    CreatedAt,
}
