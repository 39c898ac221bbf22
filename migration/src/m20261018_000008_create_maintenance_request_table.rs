use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261018_000001_create_app_user_table::AppUser,
    m20261018_000003_create_property_table::Property, m20261018_000004_create_unit_table::Unit,
};

static IDX_MAINTENANCE_PROPERTY_ID: &str = "idx_maintenance_request_property_id";
static IDX_MAINTENANCE_VENDOR_ID: &str = "idx_maintenance_request_vendor_id";
static FK_MAINTENANCE_PROPERTY_ID: &str = "fk_maintenance_request_property_id";
static FK_MAINTENANCE_UNIT_ID: &str = "fk_maintenance_request_unit_id";
static FK_MAINTENANCE_REQUESTED_BY: &str = "fk_maintenance_request_requested_by";
static FK_MAINTENANCE_VENDOR_ID: &str = "fk_maintenance_request_vendor_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceRequest::Id))
                    .col(string_uniq(MaintenanceRequest::TicketNumber))
                    .col(integer(MaintenanceRequest::PropertyId))
                    .col(integer_null(MaintenanceRequest::UnitId))
                    .col(integer(MaintenanceRequest::RequestedBy))
                    .col(integer_null(MaintenanceRequest::VendorId))
                    .col(string(MaintenanceRequest::Title))
                    .col(text(MaintenanceRequest::Description))
                    .col(text(MaintenanceRequest::Priority))
                    .col(text(MaintenanceRequest::Status))
                    .col(text_null(MaintenanceRequest::ApprovalStatus))
                    .col(big_integer_null(MaintenanceRequest::EstimatedCostCents))
                    .col(timestamp(MaintenanceRequest::CreatedAt))
                    .col(timestamp(MaintenanceRequest::UpdatedAt))
                    .col(timestamp_null(MaintenanceRequest::CompletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_PROPERTY_ID)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_UNIT_ID)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::UnitId)
                            .to(Unit::Table, Unit::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_REQUESTED_BY)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::RequestedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_MAINTENANCE_VENDOR_ID)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::VendorId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_PROPERTY_ID)
                    .table(MaintenanceRequest::Table)
                    .col(MaintenanceRequest::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MAINTENANCE_VENDOR_ID)
                    .table(MaintenanceRequest::Table)
                    .col(MaintenanceRequest::VendorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum MaintenanceRequest {
    Table,
    Id,
    TicketNumber,
    PropertyId,
    UnitId,
    RequestedBy,
    VendorId,
    Title,
    Description,
    Priority,
    Status,
    ApprovalStatus,
    EstimatedCostCents,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}
