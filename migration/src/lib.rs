pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_app_user_table;
mod m20261018_000002_create_login_code_table;
mod m20261018_000003_create_property_table;
mod m20261018_000004_create_unit_table;
mod m20261018_000005_create_lease_table;
mod m20261018_000006_create_lease_tenant_table;
mod m20261018_000007_create_rent_payment_table;
mod m20261018_000008_create_maintenance_request_table;
mod m20261018_000009_create_maintenance_comment_table;
mod m20261018_000010_create_document_table;
mod m20261018_000011_create_document_version_table;
mod m20261018_000012_create_notification_table;
mod m20261018_000013_create_invitation_table;
mod m20261018_000014_create_expense_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_app_user_table::Migration),
            Box::new(m20261018_000002_create_login_code_table::Migration),
            Box::new(m20261018_000003_create_property_table::Migration),
            Box::new(m20261018_000004_create_unit_table::Migration),
            Box::new(m20261018_000005_create_lease_table::Migration),
            Box::new(m20261018_000006_create_lease_tenant_table::Migration),
            Box::new(m20261018_000007_create_rent_payment_table::Migration),
            Box::new(m20261018_000008_create_maintenance_request_table::Migration),
            Box::new(m20261018_000009_create_maintenance_comment_table::Migration),
            Box::new(m20261018_000010_create_document_table::Migration),
            Box::new(m20261018_000011_create_document_version_table::Migration),
            Box::new(m20261018_000012_create_notification_table::Migration),
            Box::new(m20261018_000013_create_invitation_table::Migration),
            Box::new(m20261018_000014_create_expense_table::Migration),
        ]
    }
}
