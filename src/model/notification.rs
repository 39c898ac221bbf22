use chrono::NaiveDateTime;
use entity::notification::NotificationKind;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub id: i32,
    #[schema(value_type = String, example = "rent_overdue")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<entity::notification::Model> for NotificationDto {
    fn from(notification: entity::notification::Model) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            link: notification.link,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationListQuery {
    /// Only return notifications that have not been read
    pub unread_only: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl NotificationListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountDto {
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkedReadDto {
    pub updated: u64,
}
