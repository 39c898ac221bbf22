use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000005_create_lease_table::Lease;

static IDX_RENT_PAYMENT_LEASE_ID: &str = "idx_rent_payment_lease_id";
static IDX_RENT_PAYMENT_STATUS_DUE_DATE: &str = "idx_rent_payment_status_due_date";
static FK_RENT_PAYMENT_LEASE_ID: &str = "fk_rent_payment_lease_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RentPayment::Table)
                    .if_not_exists()
                    .col(pk_auto(RentPayment::Id))
                    .col(integer(RentPayment::LeaseId))
                    .col(date(RentPayment::DueDate))
                    .col(big_integer(RentPayment::AmountDueCents))
                    .col(big_integer(RentPayment::AmountPaidCents))
                    .col(text(RentPayment::Status))
                    .col(timestamp_null(RentPayment::PaidAt))
                    .col(string_null(RentPayment::Method))
                    .col(text_null(RentPayment::Notes))
                    .col(timestamp(RentPayment::CreatedAt))
                    .col(timestamp(RentPayment::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_RENT_PAYMENT_LEASE_ID)
                            .from(RentPayment::Table, RentPayment::LeaseId)
                            .to(Lease::Table, Lease::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_RENT_PAYMENT_LEASE_ID)
                    .table(RentPayment::Table)
                    .col(RentPayment::LeaseId)
                    .to_owned(),
            )
            .await?;

        // Used by the daily overdue sweep
        manager
            .create_index(
                Index::create()
                    .name(IDX_RENT_PAYMENT_STATUS_DUE_DATE)
                    .table(RentPayment::Table)
                    .col(RentPayment::Status)
                    .col(RentPayment::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RentPayment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum RentPayment {
    Table,
    Id,
    LeaseId,
    DueDate,
    AmountDueCents,
    AmountPaidCents,
    Status,
    PaidAt,
    Method,
    Notes,
    CreatedAt,
    UpdatedAt,
}
