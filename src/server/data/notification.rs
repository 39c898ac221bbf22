use chrono::Utc;
use entity::notification::NotificationKind;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::server::data::{fetch_page, Page};

/// A notification to be delivered to one or more users
#[derive(Clone, Debug)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts one copy of the notification per user
    pub async fn create_many(
        &self,
        user_ids: &[i32],
        notification: &NewNotification,
    ) -> Result<u64, DbErr> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc();
        let rows = user_ids
            .iter()
            .map(|user_id| entity::notification::ActiveModel {
                user_id: ActiveValue::Set(*user_id),
                kind: ActiveValue::Set(notification.kind),
                title: ActiveValue::Set(notification.title.clone()),
                body: ActiveValue::Set(notification.body.clone()),
                link: ActiveValue::Set(notification.link.clone()),
                read_at: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            });

        entity::prelude::Notification::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(user_ids.len() as u64)
    }

    /// Gets a notification owned by the user
    pub async fn get_owned(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> Result<Option<entity::notification::Model>, DbErr> {
        entity::prelude::Notification::find_by_id(notification_id)
            .filter(entity::notification::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        user_id: i32,
        unread_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::notification::Model>, DbErr> {
        let mut select = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id);
        if unread_only {
            select = select.filter(entity::notification::Column::ReadAt.is_null());
        }

        fetch_page(self.db, select, page, limit).await
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .count(self.db)
            .await
    }

    /// Marks the user's notification read, returns whether a row matched
    pub async fn mark_read(&self, user_id: i32, notification_id: i32) -> Result<bool, DbErr> {
        let Some(notification) = self.get_owned(user_id, notification_id).await? else {
            return Ok(false);
        };

        if notification.read_at.is_none() {
            entity::prelude::Notification::update_many()
                .set(entity::notification::ActiveModel {
                    read_at: ActiveValue::Set(Some(Utc::now().naive_utc())),
                    ..Default::default()
                })
                .filter(entity::notification::Column::Id.eq(notification.id))
                .exec(self.db)
                .await?;
        }

        Ok(true)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .set(entity::notification::ActiveModel {
                read_at: ActiveValue::Set(Some(Utc::now().naive_utc())),
                ..Default::default()
            })
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::ReadAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, user_id: i32, notification_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::Id.eq(notification_id))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
