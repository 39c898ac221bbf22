//! In-app notifications.

use entity::notification::NotificationKind;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{
    model::{api::PageQuery, notification::NotificationDto},
    server::{
        data::{
            notification::{NewNotification, NotificationRepository},
            Page,
        },
        error::{request::RequestError, Error},
        service::access::Actor,
    },
};

/// Delivers `kind` to every user in `user_ids`, skipping `exclude` (usually the actor)
pub async fn notify<C: ConnectionTrait>(
    db: &C,
    user_ids: &[i32],
    exclude: Option<i32>,
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    link: Option<String>,
) -> Result<u64, Error> {
    let mut recipients: Vec<i32> = user_ids
        .iter()
        .copied()
        .filter(|id| Some(*id) != exclude)
        .collect();
    recipients.sort_unstable();
    recipients.dedup();

    let created = NotificationRepository::new(db)
        .create_many(
            &recipients,
            &NewNotification {
                kind,
                title: title.into(),
                body: body.into(),
                link,
            },
        )
        .await?;

    tracing::debug!("Created {} {:?} notification(s)", created, kind);

    Ok(created)
}

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        unread_only: bool,
        page: PageQuery,
    ) -> Result<Page<NotificationDto>, Error> {
        let notifications = NotificationRepository::new(self.db)
            .list(actor.id, unread_only, page.page(), page.limit())
            .await?;

        Ok(notifications.map(NotificationDto::from))
    }

    pub async fn unread_count(&self, actor: &Actor) -> Result<u64, Error> {
        Ok(NotificationRepository::new(self.db)
            .unread_count(actor.id)
            .await?)
    }

    pub async fn mark_read(&self, actor: &Actor, notification_id: i32) -> Result<(), Error> {
        if !NotificationRepository::new(self.db)
            .mark_read(actor.id, notification_id)
            .await?
        {
            return Err(RequestError::NotFound("Notification").into());
        }

        Ok(())
    }

    pub async fn mark_all_read(&self, actor: &Actor) -> Result<u64, Error> {
        Ok(NotificationRepository::new(self.db)
            .mark_all_read(actor.id)
            .await?)
    }

    pub async fn delete(&self, actor: &Actor, notification_id: i32) -> Result<(), Error> {
        let deleted = NotificationRepository::new(self.db)
            .delete(actor.id, notification_id)
            .await?;
        if deleted == 0 {
            return Err(RequestError::NotFound("Notification").into());
        }

        Ok(())
    }
}
