use chrono::Utc;
use entity::app_user::Role;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::UserModel, TestContext};

impl TestContext {
    pub fn user<'a>(&'a self) -> UserFixtures<'a> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert a user with the given role and a unique generated e-mail.
    pub async fn insert_user(&self, role: Role) -> Result<UserModel, TestError> {
        let seq = self.setup.next_sequence();
        self.insert_user_with_email(&format!("user{}@example.com", seq), role)
            .await
    }

    pub async fn insert_user_with_email(
        &self,
        email: &str,
        role: Role,
    ) -> Result<UserModel, TestError> {
        let now = Utc::now().naive_utc();
        Ok(
            entity::prelude::AppUser::insert(entity::app_user::ActiveModel {
                email: ActiveValue::Set(email.to_string()),
                name: ActiveValue::Set(format!("Test {:?}", role)),
                role: ActiveValue::Set(role),
                phone: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_admin(&self) -> Result<UserModel, TestError> {
        self.insert_user(Role::Admin).await
    }

    pub async fn insert_landlord(&self) -> Result<UserModel, TestError> {
        self.insert_user(Role::Landlord).await
    }

    pub async fn insert_pmc(&self) -> Result<UserModel, TestError> {
        self.insert_user(Role::Pmc).await
    }

    pub async fn insert_tenant(&self) -> Result<UserModel, TestError> {
        self.insert_user(Role::Tenant).await
    }

    pub async fn insert_vendor(&self) -> Result<UserModel, TestError> {
        self.insert_user(Role::Vendor).await
    }

    /// Insert a login code for the user expiring at `expires_at`.
    pub async fn insert_login_code(
        &self,
        user_id: i32,
        code: &str,
        expires_at: chrono::NaiveDateTime,
    ) -> Result<entity::login_code::Model, TestError> {
        Ok(
            entity::prelude::LoginCode::insert(entity::login_code::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                code: ActiveValue::Set(code.to_string()),
                expires_at: ActiveValue::Set(expires_at),
                consumed_at: ActiveValue::Set(None),
                failed_attempts: ActiveValue::Set(0),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
