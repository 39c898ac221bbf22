use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser, m20261018_000005_create_lease_table::Lease,
};

static IDX_INVITATION_INVITED_BY: &str = "idx_invitation_invited_by";
static FK_INVITATION_INVITED_BY: &str = "fk_invitation_invited_by";
static FK_INVITATION_LEASE_ID: &str = "fk_invitation_lease_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitation::Table)
                    .if_not_exists()
                    .col(pk_auto(Invitation::Id))
                    .col(string(Invitation::Email))
                    .col(text(Invitation::Role))
                    .col(string_uniq(Invitation::Token))
                    .col(integer(Invitation::InvitedBy))
                    .col(integer_null(Invitation::LeaseId))
                    .col(text(Invitation::Status))
                    .col(timestamp(Invitation::ExpiresAt))
                    .col(timestamp_null(Invitation::AcceptedAt))
                    .col(timestamp(Invitation::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVITATION_INVITED_BY)
                            .from(Invitation::Table, Invitation::InvitedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_INVITATION_LEASE_ID)
                            .from(Invitation::Table, Invitation::LeaseId)
                            .to(Lease::Table, Lease::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVITATION_INVITED_BY)
                    .table(Invitation::Table)
                    .col(Invitation::InvitedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Invitation {
    Table,
    Id,
    Email,
    Role,
    Token,
    InvitedBy,
    LeaseId,
    Status,
    ExpiresAt,
    AcceptedAt,
    CreatedAt,
}
