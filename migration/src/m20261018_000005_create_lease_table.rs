use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000004_create_unit_table::Unit;

static IDX_LEASE_UNIT_ID: &str = "idx_lease_unit_id";
static FK_LEASE_UNIT_ID: &str = "fk_lease_unit_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lease::Table)
                    .if_not_exists()
                    .col(pk_auto(Lease::Id))
                    .col(integer(Lease::UnitId))
                    .col(date(Lease::StartDate))
                    .col(date(Lease::EndDate))
                    .col(big_integer(Lease::RentCents))
                    .col(big_integer(Lease::DepositCents))
                    .col(integer(Lease::RentDueDay))
                    .col(text(Lease::Status))
                    .col(timestamp(Lease::CreatedAt))
                    .col(timestamp(Lease::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_LEASE_UNIT_ID)
                            .from(Lease::Table, Lease::UnitId)
                            .to(Unit::Table, Unit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEASE_UNIT_ID)
                    .table(Lease::Table)
                    .col(Lease::UnitId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lease::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Lease {
    Table,
    Id,
    UnitId,
    StartDate,
    EndDate,
    RentCents,
    DepositCents,
    RentDueDay,
    Status,
    CreatedAt,
    UpdatedAt,
}
