use sea_orm_migration::{prelude::*, schema::*};

static IDX_APP_USER_ROLE: &str = "idx_app_user_role";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_uniq(AppUser::Email))
                    .col(string(AppUser::Name))
                    .col(text(AppUser::Role))
                    .col(string_null(AppUser::Phone))
                    .col(timestamp(AppUser::CreatedAt))
                    .col(timestamp(AppUser::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_APP_USER_ROLE)
                    .table(AppUser::Table)
                    .col(AppUser::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_APP_USER_ROLE)
                    .table(AppUser::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AppUser {
    Table,
    Id,
    Email,
    Name,
    Role,
    Phone,
    CreatedAt,
    UpdatedAt,
}
