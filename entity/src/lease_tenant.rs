use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lease_tenant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lease_id: i32,
    pub tenant_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lease::Entity",
        from = "Column::LeaseId",
        to = "super::lease::Column::Id",
        on_delete = "Cascade"
    )]
    Lease,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::TenantId",
        to = "super::app_user::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lease.def()
    }
}

impl Related<super::app_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
