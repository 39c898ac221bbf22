use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000001_create_app_user_table::AppUser;

static IDX_NOTIFICATION_USER_ID_READ_AT: &str = "idx_notification_user_id_read_at";
static FK_NOTIFICATION_USER_ID: &str = "fk_notification_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::Id))
                    .col(integer(Notification::UserId))
                    .col(text(Notification::Kind))
                    .col(string(Notification::Title))
                    .col(text(Notification::Body))
                    .col(string_null(Notification::Link))
                    .col(timestamp_null(Notification::ReadAt))
                    .col(timestamp(Notification::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_NOTIFICATION_USER_ID)
                            .from(Notification::Table, Notification::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_NOTIFICATION_USER_ID_READ_AT)
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::ReadAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    UserId,
    Kind,
    Title,
    Body,
    Link,
    ReadAt,
    CreatedAt,
}
