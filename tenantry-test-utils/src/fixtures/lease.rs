use chrono::{Days, NaiveDate, Utc};
use entity::{lease::LeaseStatus, rent_payment::RentStatus};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    error::TestError,
    model::{LeaseModel, RentPaymentModel},
    TestContext,
};

impl TestContext {
    pub fn lease<'a>(&'a self) -> LeaseFixtures<'a> {
        LeaseFixtures { setup: self }
    }
}

pub struct LeaseFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> LeaseFixtures<'a> {
    /// Insert a lease with 1,500.00 rent due on the 1st and the given tenants.
    pub async fn insert_lease(
        &self,
        unit_id: i32,
        tenant_ids: &[i32],
        status: LeaseStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<LeaseModel, TestError> {
        let now = Utc::now().naive_utc();
        let lease = entity::prelude::Lease::insert(entity::lease::ActiveModel {
            unit_id: ActiveValue::Set(unit_id),
            start_date: ActiveValue::Set(start_date),
            end_date: ActiveValue::Set(end_date),
            rent_cents: ActiveValue::Set(150_000),
            deposit_cents: ActiveValue::Set(150_000),
            rent_due_day: ActiveValue::Set(1),
            status: ActiveValue::Set(status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        for tenant_id in tenant_ids {
            self.add_tenant(lease.id, *tenant_id).await?;
        }

        Ok(lease)
    }

    /// Insert an active lease that started 30 days ago and runs for a year.
    pub async fn insert_active_lease(
        &self,
        unit_id: i32,
        tenant_ids: &[i32],
    ) -> Result<LeaseModel, TestError> {
        let today = Utc::now().date_naive();
        let start = today - Days::new(30);
        let end = start + Days::new(365);
        self.insert_lease(unit_id, tenant_ids, LeaseStatus::Active, start, end)
            .await
    }

    /// Insert a draft lease starting next month and running for a year.
    pub async fn insert_draft_lease(
        &self,
        unit_id: i32,
        tenant_ids: &[i32],
    ) -> Result<LeaseModel, TestError> {
        let today = Utc::now().date_naive();
        let start = today + Days::new(30);
        let end = start + Days::new(365);
        self.insert_lease(unit_id, tenant_ids, LeaseStatus::Draft, start, end)
            .await
    }

    pub async fn add_tenant(
        &self,
        lease_id: i32,
        tenant_id: i32,
    ) -> Result<entity::lease_tenant::Model, TestError> {
        Ok(
            entity::prelude::LeaseTenant::insert(entity::lease_tenant::ActiveModel {
                lease_id: ActiveValue::Set(lease_id),
                tenant_id: ActiveValue::Set(tenant_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_rent_payment(
        &self,
        lease_id: i32,
        due_date: NaiveDate,
        amount_due_cents: i64,
        status: RentStatus,
    ) -> Result<RentPaymentModel, TestError> {
        let now = Utc::now().naive_utc();
        Ok(
            entity::prelude::RentPayment::insert(entity::rent_payment::ActiveModel {
                lease_id: ActiveValue::Set(lease_id),
                due_date: ActiveValue::Set(due_date),
                amount_due_cents: ActiveValue::Set(amount_due_cents),
                amount_paid_cents: ActiveValue::Set(0),
                status: ActiveValue::Set(status),
                paid_at: ActiveValue::Set(None),
                method: ActiveValue::Set(None),
                notes: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
