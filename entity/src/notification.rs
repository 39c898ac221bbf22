use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[sea_orm(string_value = "lease_activated")]
    LeaseActivated,
    #[sea_orm(string_value = "rent_recorded")]
    RentRecorded,
    #[sea_orm(string_value = "rent_overdue")]
    RentOverdue,
    #[sea_orm(string_value = "maintenance_created")]
    MaintenanceCreated,
    #[sea_orm(string_value = "maintenance_assigned")]
    MaintenanceAssigned,
    #[sea_orm(string_value = "maintenance_approval")]
    MaintenanceApproval,
    #[sea_orm(string_value = "maintenance_status")]
    MaintenanceStatus,
    #[sea_orm(string_value = "document_change")]
    DocumentChange,
    #[sea_orm(string_value = "document_deletion")]
    DocumentDeletion,
    #[sea_orm(string_value = "pmc_assigned")]
    PmcAssigned,
    #[sea_orm(string_value = "invitation_accepted")]
    InvitationAccepted,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub link: Option<String>,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::UserId",
        to = "super::app_user::Column::Id",
        on_delete = "Cascade"
    )]
    AppUser,
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
