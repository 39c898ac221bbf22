use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000001_create_app_user_table::AppUser;

static IDX_LOGIN_CODE_USER_ID: &str = "idx_login_code_user_id";
static FK_LOGIN_CODE_USER_ID: &str = "fk_login_code_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginCode::Table)
                    .if_not_exists()
                    .col(pk_auto(LoginCode::Id))
                    .col(integer(LoginCode::UserId))
                    .col(string(LoginCode::Code))
                    .col(timestamp(LoginCode::ExpiresAt))
                    .col(timestamp_null(LoginCode::ConsumedAt))
                    .col(integer(LoginCode::FailedAttempts).default(0))
                    .col(timestamp(LoginCode::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LOGIN_CODE_USER_ID)
                            .from(LoginCode::Table, LoginCode::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LOGIN_CODE_USER_ID)
                    .table(LoginCode::Table)
                    .col(LoginCode::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginCode::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LoginCode {
    Table,
    Id,
    UserId,
    Code,
    ExpiresAt,
    ConsumedAt,
    FailedAttempts,
    CreatedAt,
}
