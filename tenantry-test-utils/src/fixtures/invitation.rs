use chrono::{NaiveDateTime, Utc};
use entity::{app_user::Role, invitation::InvitationStatus};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::InvitationModel, TestContext};

impl TestContext {
    pub fn invitation<'a>(&'a self) -> InvitationFixtures<'a> {
        InvitationFixtures { setup: self }
    }
}

pub struct InvitationFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> InvitationFixtures<'a> {
    /// Insert a pending invitation with a unique 32-character token.
    pub async fn insert_invitation(
        &self,
        invited_by: i32,
        email: &str,
        role: Role,
        lease_id: Option<i32>,
        expires_at: NaiveDateTime,
    ) -> Result<InvitationModel, TestError> {
        let seq = self.setup.next_sequence();
        Ok(
            entity::prelude::Invitation::insert(entity::invitation::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                role: ActiveValue::Set(role),
                token: ActiveValue::Set(format!("{:0>32}", seq)),
                invited_by: ActiveValue::Set(invited_by),
                lease_id: ActiveValue::Set(lease_id),
                status: ActiveValue::Set(InvitationStatus::Pending),
                expires_at: ActiveValue::Set(expires_at),
                accepted_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
