use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser, m20261018_000005_create_lease_table::Lease,
};

static IDX_LEASE_TENANT_UNIQUE: &str = "idx_lease_tenant_lease_id_tenant_id";
static IDX_LEASE_TENANT_TENANT_ID: &str = "idx_lease_tenant_tenant_id";
static FK_LEASE_TENANT_LEASE_ID: &str = "fk_lease_tenant_lease_id";
static FK_LEASE_TENANT_TENANT_ID: &str = "fk_lease_tenant_tenant_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeaseTenant::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaseTenant::Id))
                    .col(integer(LeaseTenant::LeaseId))
                    .col(integer(LeaseTenant::TenantId))
                    .col(timestamp(LeaseTenant::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LEASE_TENANT_LEASE_ID)
                            .from(LeaseTenant::Table, LeaseTenant::LeaseId)
                            .to(Lease::Table, Lease::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LEASE_TENANT_TENANT_ID)
                            .from(LeaseTenant::Table, LeaseTenant::TenantId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEASE_TENANT_UNIQUE)
                    .table(LeaseTenant::Table)
                    .col(LeaseTenant::LeaseId)
                    .col(LeaseTenant::TenantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEASE_TENANT_TENANT_ID)
                    .table(LeaseTenant::Table)
                    .col(LeaseTenant::TenantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaseTenant::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LeaseTenant {
    Table,
    Id,
    LeaseId,
    TenantId,
    CreatedAt,
}
