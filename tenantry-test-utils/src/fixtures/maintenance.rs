use chrono::Utc;
use entity::maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel};

use crate::{error::TestError, model::MaintenanceRequestModel, TestContext};

impl TestContext {
    pub fn maintenance<'a>(&'a self) -> MaintenanceFixtures<'a> {
        MaintenanceFixtures { setup: self }
    }
}

pub struct MaintenanceFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> MaintenanceFixtures<'a> {
    /// Insert an open request with a unique placeholder ticket number.
    pub async fn insert_request(
        &self,
        property_id: i32,
        unit_id: Option<i32>,
        requested_by: i32,
        priority: Priority,
    ) -> Result<MaintenanceRequestModel, TestError> {
        let seq = self.setup.next_sequence();
        let now = Utc::now().naive_utc();
        Ok(entity::prelude::MaintenanceRequest::insert(
            entity::maintenance_request::ActiveModel {
                ticket_number: ActiveValue::Set(format!("MNT-000000-{:06X}", seq)),
                property_id: ActiveValue::Set(property_id),
                unit_id: ActiveValue::Set(unit_id),
                requested_by: ActiveValue::Set(requested_by),
                vendor_id: ActiveValue::Set(None),
                title: ActiveValue::Set("Leaking faucet".to_string()),
                description: ActiveValue::Set("Kitchen faucet drips constantly".to_string()),
                priority: ActiveValue::Set(priority),
                status: ActiveValue::Set(MaintenanceStatus::Open),
                approval_status: ActiveValue::Set(None),
                estimated_cost_cents: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                completed_at: ActiveValue::Set(None),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Put a request into the `assigned` state with the given vendor and approval.
    pub async fn assign_vendor(
        &self,
        request: MaintenanceRequestModel,
        vendor_id: i32,
        estimated_cost_cents: i64,
        approval_status: ApprovalStatus,
    ) -> Result<MaintenanceRequestModel, TestError> {
        let mut active = request.into_active_model();
        active.vendor_id = ActiveValue::Set(Some(vendor_id));
        active.estimated_cost_cents = ActiveValue::Set(Some(estimated_cost_cents));
        active.approval_status = ActiveValue::Set(Some(approval_status));
        active.status = ActiveValue::Set(MaintenanceStatus::Assigned);

        Ok(active.update(&self.setup.db).await?)
    }

    pub async fn set_status(
        &self,
        request: MaintenanceRequestModel,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceRequestModel, TestError> {
        let mut active = request.into_active_model();
        active.status = ActiveValue::Set(status);

        Ok(active.update(&self.setup.db).await?)
    }
}
