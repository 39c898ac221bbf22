use chrono::{NaiveDateTime, Utc};
use entity::{app_user::Role, invitation::InvitationStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::data::{fetch_page, Page};

#[derive(Clone, Debug)]
pub struct NewInvitation {
    pub email: String,
    pub role: Role,
    pub token: String,
    pub invited_by: i32,
    pub lease_id: Option<i32>,
    pub expires_at: NaiveDateTime,
}

pub struct InvitationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InvitationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        invitation: NewInvitation,
    ) -> Result<entity::invitation::Model, DbErr> {
        entity::invitation::ActiveModel {
            email: ActiveValue::Set(invitation.email),
            role: ActiveValue::Set(invitation.role),
            token: ActiveValue::Set(invitation.token),
            invited_by: ActiveValue::Set(invitation.invited_by),
            lease_id: ActiveValue::Set(invitation.lease_id),
            status: ActiveValue::Set(InvitationStatus::Pending),
            expires_at: ActiveValue::Set(invitation.expires_at),
            accepted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        invitation_id: i32,
    ) -> Result<Option<entity::invitation::Model>, DbErr> {
        entity::prelude::Invitation::find_by_id(invitation_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_token(
        &self,
        token: &str,
    ) -> Result<Option<entity::invitation::Model>, DbErr> {
        entity::prelude::Invitation::find()
            .filter(entity::invitation::Column::Token.eq(token))
            .one(self.db)
            .await
    }

    /// Lists invitations sent by `invited_by`, or all of them when `None`
    pub async fn list(
        &self,
        invited_by: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::invitation::Model>, DbErr> {
        let mut select = entity::prelude::Invitation::find()
            .order_by_desc(entity::invitation::Column::CreatedAt)
            .order_by_desc(entity::invitation::Column::Id);
        if let Some(invited_by) = invited_by {
            select = select.filter(entity::invitation::Column::InvitedBy.eq(invited_by));
        }

        fetch_page(self.db, select, page, limit).await
    }

    pub async fn set_status(
        &self,
        invitation: entity::invitation::Model,
        status: InvitationStatus,
    ) -> Result<entity::invitation::Model, DbErr> {
        let mut invitation_am = invitation.into_active_model();
        invitation_am.status = ActiveValue::Set(status);
        if status == InvitationStatus::Accepted {
            invitation_am.accepted_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        }

        invitation_am.update(self.db).await
    }

    /// Marks pending invitations that expired at or before `now`
    pub async fn expire_stale(&self, now: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::Invitation::update_many()
            .set(entity::invitation::ActiveModel {
                status: ActiveValue::Set(InvitationStatus::Expired),
                ..Default::default()
            })
            .filter(entity::invitation::Column::Status.eq(InvitationStatus::Pending))
            .filter(entity::invitation::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
