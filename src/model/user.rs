use chrono::NaiveDateTime;
use entity::app_user::Role;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    #[schema(value_type = String, example = "landlord")]
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<entity::app_user::Model> for UserDto {
    fn from(user: entity::app_user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileDto {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Only return users with this role
    #[param(value_type = Option<String>)]
    pub role: Option<Role>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl UserListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}
