use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261018_000003_create_property_table::Property;

static IDX_UNIT_PROPERTY_NUMBER: &str = "idx_unit_property_id_unit_number";
static FK_UNIT_PROPERTY_ID: &str = "fk_unit_property_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Unit::Table)
                    .if_not_exists()
                    .col(pk_auto(Unit::Id))
                    .col(integer(Unit::PropertyId))
                    .col(string(Unit::UnitNumber))
                    .col(integer(Unit::Bedrooms))
                    .col(double(Unit::Bathrooms))
                    .col(integer_null(Unit::SquareFeet))
                    .col(big_integer(Unit::MarketRentCents))
                    .col(text(Unit::Status))
                    .col(timestamp(Unit::CreatedAt))
                    .col(timestamp(Unit::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_UNIT_PROPERTY_ID)
                            .from(Unit::Table, Unit::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unit numbers only need to be unique within their property
        manager
            .create_index(
                Index::create()
                    .name(IDX_UNIT_PROPERTY_NUMBER)
                    .table(Unit::Table)
                    .col(Unit::PropertyId)
                    .col(Unit::UnitNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Unit::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Unit {
    Table,
    Id,
    PropertyId,
    UnitNumber,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    MarketRentCents,
    Status,
    CreatedAt,
    UpdatedAt,
}
