use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser,
    m20261018_000008_create_maintenance_request_table::MaintenanceRequest,
};

static IDX_MAINTENANCE_COMMENT_REQUEST_ID: &str = "idx_maintenance_comment_request_id";
static FK_MAINTENANCE_COMMENT_REQUEST_ID: &str = "fk_maintenance_comment_request_id";
static FK_MAINTENANCE_COMMENT_AUTHOR_ID: &str = "fk_maintenance_comment_author_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceComment::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceComment::Id))
                    .col(integer(MaintenanceComment::RequestId))
                    .col(integer(MaintenanceComment::AuthorId))
                    .col(text(MaintenanceComment::Body))
                    .col(timestamp(MaintenanceComment::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_COMMENT_REQUEST_ID)
                            .from(MaintenanceComment::Table, MaintenanceComment::RequestId)
                            .to(MaintenanceRequest::Table, MaintenanceRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_COMMENT_AUTHOR_ID)
                            .from(MaintenanceComment::Table, MaintenanceComment::AuthorId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_COMMENT_REQUEST_ID)
                    .table(MaintenanceComment::Table)
                    .col(MaintenanceComment::RequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceComment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MaintenanceComment {
    Table,
    Id,
    RequestId,
    AuthorId,
    Body,
    CreatedAt,
}
