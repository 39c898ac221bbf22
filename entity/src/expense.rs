use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    #[sea_orm(string_value = "repairs")]
    Repairs,
    #[sea_orm(string_value = "utilities")]
    Utilities,
    #[sea_orm(string_value = "taxes")]
    Taxes,
    #[sea_orm(string_value = "insurance")]
    Insurance,
    #[sea_orm(string_value = "management")]
    Management,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub maintenance_request_id: Option<i32>,
    pub category: ExpenseCategory,
    pub amount_cents: i64,
    pub incurred_on: Date,
    pub description: String,
    pub recorded_by: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::maintenance_request::Entity",
        from = "Column::MaintenanceRequestId",
        to = "super::maintenance_request::Column::Id",
        on_delete = "SetNull"
    )]
    MaintenanceRequest,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::RecordedBy",
        to = "super::app_user::Column::Id"
    )]
    Recorder,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
