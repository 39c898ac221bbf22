use chrono::Utc;
use entity::app_user::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::data::{fetch_page, Page};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new user; `email` is expected to be normalized already
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        role: Role,
        phone: Option<String>,
    ) -> Result<entity::app_user::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let user = entity::app_user::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            name: ActiveValue::Set(name.to_string()),
            role: ActiveValue::Set(role),
            phone: ActiveValue::Set(phone),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_email(
        &self,
        email: &str,
    ) -> Result<Option<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn get_many(&self, user_ids: &[i32]) -> Result<Vec<entity::app_user::Model>, DbErr> {
        entity::prelude::AppUser::find()
            .filter(entity::app_user::Column::Id.is_in(user_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Lists users ordered by id, optionally only those with `role`
    pub async fn list(
        &self,
        role: Option<Role>,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::app_user::Model>, DbErr> {
        let mut select =
            entity::prelude::AppUser::find().order_by_asc(entity::app_user::Column::Id);
        if let Some(role) = role {
            select = select.filter(entity::app_user::Column::Role.eq(role));
        }

        fetch_page(self.db, select, page, limit).await
    }

    /// Updates the given profile fields, returning `None` if the user does not exist
    pub async fn update_profile(
        &self,
        user_id: i32,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<Option<entity::app_user::Model>, DbErr> {
        let Some(user) = self.get(user_id).await? else {
            return Ok(None);
        };

        let mut user_am = user.into_active_model();
        if let Some(name) = name {
            user_am.name = ActiveValue::Set(name);
        }
        if let Some(phone) = phone {
            user_am.phone = ActiveValue::Set(Some(phone).filter(|p| !p.is_empty()));
        }
        user_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(user_am.update(self.db).await?))
    }
}
