use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[sea_orm(string_value = "single_family")]
    SingleFamily,
    #[sea_orm(string_value = "multi_family")]
    MultiFamily,
    #[sea_orm(string_value = "apartment")]
    Apartment,
    #[sea_orm(string_value = "condo")]
    Condo,
    #[sea_orm(string_value = "commercial")]
    Commercial,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "property")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub landlord_id: i32,
    /// Property management company managing this property on the landlord's behalf
    pub pmc_id: Option<i32>,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub property_type: PropertyType,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::LandlordId",
        to = "super::app_user::Column::Id"
    )]
    Landlord,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::PmcId",
        to = "super::app_user::Column::Id",
        on_delete = "SetNull"
    )]
    Pmc,
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Landlord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
