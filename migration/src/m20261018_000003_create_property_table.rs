use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000001_create_app_user_table::AppUser;

static IDX_PROPERTY_LANDLORD_ID: &str = "idx_property_landlord_id";
static IDX_PROPERTY_PMC_ID: &str = "idx_property_pmc_id";
static FK_PROPERTY_LANDLORD_ID: &str = "fk_property_landlord_id";
static FK_PROPERTY_PMC_ID: &str = "fk_property_pmc_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(pk_auto(Property::Id))
                    .col(integer(Property::LandlordId))
                    .col(integer_null(Property::PmcId))
                    .col(string(Property::Name))
                    .col(string(Property::AddressLine1))
                    .col(string_null(Property::AddressLine2))
                    .col(string(Property::City))
                    .col(string(Property::State))
                    .col(string(Property::PostalCode))
                    .col(string(Property::Country))
                    .col(text(Property::PropertyType))
                    .col(timestamp(Property::CreatedAt))
                    .col(timestamp(Property::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROPERTY_LANDLORD_ID)
                            .from(Property::Table, Property::LandlordId)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROPERTY_PMC_ID)
                            .from(Property::Table, Property::PmcId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROPERTY_LANDLORD_ID)
                    .table(Property::Table)
                    .col(Property::LandlordId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PROPERTY_PMC_ID)
                    .table(Property::Table)
                    .col(Property::PmcId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Property::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Property {
    Table,
    Id,
    LandlordId,
    PmcId,
    Name,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
    PropertyType,
    CreatedAt,
    UpdatedAt,
}
