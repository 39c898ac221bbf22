use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    #[sea_orm(string_value = "lease_agreement")]
    LeaseAgreement,
    #[sea_orm(string_value = "notice")]
    Notice,
    #[sea_orm(string_value = "inspection")]
    Inspection,
    #[sea_orm(string_value = "receipt")]
    Receipt,
    #[sea_orm(string_value = "insurance")]
    Insurance,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub lease_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    pub category: DocumentCategory,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub version: i32,
    /// Two-party approval state for pending version changes and deletions
    pub metadata: Json,
    pub created_at: DateTime,
    pub updated_at: DateTime,
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
        belongs_to = "super::lease::Entity",
        from = "Column::LeaseId",
        to = "super::lease::Column::Id",
        on_delete = "Cascade"
    )]
    Lease,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::UploadedBy",
        to = "super::app_user::Column::Id"
    )]
    Uploader,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
