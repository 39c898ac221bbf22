use chrono::Utc;
use entity::notification::NotificationKind;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::NotificationModel, TestContext};

impl TestContext {
    pub fn notification<'a>(&'a self) -> NotificationFixtures<'a> {
        NotificationFixtures { setup: self }
    }
}

pub struct NotificationFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> NotificationFixtures<'a> {
    pub async fn insert_notification(
        &self,
        user_id: i32,
        read: bool,
    ) -> Result<NotificationModel, TestError> {
        let now = Utc::now().naive_utc();
        Ok(
            entity::prelude::Notification::insert(entity::notification::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                kind: ActiveValue::Set(NotificationKind::RentRecorded),
                title: ActiveValue::Set("Payment recorded".to_string()),
                body: ActiveValue::Set("A payment was recorded".to_string()),
                link: ActiveValue::Set(None),
                read_at: ActiveValue::Set(read.then_some(now)),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
