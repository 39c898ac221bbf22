//! User accounts.

use sea_orm::DatabaseConnection;

use crate::{
    model::user::{UpdateProfileDto, UserDto, UserListQuery},
    server::{
        data::{user::UserRepository, Page},
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, retry::RetryContext, validate},
    },
};

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves a user, retrying transient database failures.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - User found
    /// - `Ok(None)` - User not found in database
    /// - `Err(Error::DbErr)` - Database operation failed after retries
    pub async fn get_user(&self, user_id: i32) -> Result<Option<entity::app_user::Model>, Error> {
        let mut ctx: RetryContext<()> = RetryContext::new();

        let db = self.db.clone();

        ctx.execute_with_retry(&format!("get user ID {}", user_id), |_| {
            let db = db.clone();

            Box::pin(async move { Ok(UserRepository::new(&db).get(user_id).await?) })
        })
        .await
    }

    /// Lists users; admin only
    pub async fn list(&self, actor: &Actor, query: UserListQuery) -> Result<Page<UserDto>, Error> {
        if !actor.is_admin() {
            return Err(AuthError::forbidden("Only admins can list users").into());
        }

        let page = query.page_query();
        let users = UserRepository::new(self.db)
            .list(query.role, page.page(), page.limit())
            .await?;

        Ok(users.map(UserDto::from))
    }

    /// Gets a user; admins see anyone, others only themselves
    pub async fn get(&self, actor: &Actor, user_id: i32) -> Result<UserDto, Error> {
        let Some(user) = UserRepository::new(self.db).get(user_id).await? else {
            return Err(RequestError::NotFound("User").into());
        };

        if !actor.is_admin() && actor.id != user.id {
            return Err(AuthError::forbidden(format!(
                "User {} may not view user {}",
                actor.id, user.id
            ))
            .into());
        }

        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        profile: UpdateProfileDto,
    ) -> Result<UserDto, Error> {
        let name = profile
            .name
            .map(|name| validate::required_text("name", &name))
            .transpose()?;
        let phone = profile.phone.map(|phone| phone.trim().to_string());

        let Some(user) = UserRepository::new(self.db)
            .update_profile(actor.id, name, phone)
            .await?
        else {
            return Err(RequestError::NotFound("User").into());
        };

        Ok(user.into())
    }
}
