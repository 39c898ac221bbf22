use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser,
    m20261018_000003_create_property_table::Property,
    m20261018_000008_create_maintenance_request_table::MaintenanceRequest,
};

static IDX_EXPENSE_PROPERTY_ID_INCURRED_ON: &str = "idx_expense_property_id_incurred_on";
static FK_EXPENSE_PROPERTY_ID: &str = "fk_expense_property_id";
static FK_EXPENSE_MAINTENANCE_REQUEST_ID: &str = "fk_expense_maintenance_request_id";
static FK_EXPENSE_RECORDED_BY: &str = "fk_expense_recorded_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expense::Table)
                    .if_not_exists()
                    .col(pk_auto(Expense::Id))
                    .col(integer(Expense::PropertyId))
                    .col(integer_null(Expense::MaintenanceRequestId))
                    .col(text(Expense::Category))
                    .col(big_integer(Expense::AmountCents))
                    .col(date(Expense::IncurredOn))
                    .col(string(Expense::Description))
                    .col(integer(Expense::RecordedBy))
                    .col(timestamp(Expense::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EXPENSE_PROPERTY_ID)
                            .from(Expense::Table, Expense::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EXPENSE_MAINTENANCE_REQUEST_ID)
                            .from(Expense::Table, Expense::MaintenanceRequestId)
                            .to(MaintenanceRequest::Table, MaintenanceRequest::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EXPENSE_RECORDED_BY)
                            .from(Expense::Table, Expense::RecordedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EXPENSE_PROPERTY_ID_INCURRED_ON)
                    .table(Expense::Table)
                    .col(Expense::PropertyId)
                    .col(Expense::IncurredOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expense::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Expense {
    Table,
    Id,
    PropertyId,
    MaintenanceRequestId,
    Category,
    AmountCents,
    IncurredOn,
    Description,
    RecordedBy,
    CreatedAt,
}
