use chrono::{NaiveDateTime, Utc};
use migration::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

pub struct LoginCodeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LoginCodeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        code: &str,
        expires_at: NaiveDateTime,
    ) -> Result<entity::login_code::Model, DbErr> {
        entity::login_code::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            code: ActiveValue::Set(code.to_string()),
            expires_at: ActiveValue::Set(expires_at),
            consumed_at: ActiveValue::Set(None),
            failed_attempts: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Finds an unconsumed code for the user that has not expired at `now`
    pub async fn find_valid(
        &self,
        user_id: i32,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<Option<entity::login_code::Model>, DbErr> {
        entity::prelude::LoginCode::find()
            .filter(entity::login_code::Column::UserId.eq(user_id))
            .filter(entity::login_code::Column::Code.eq(code))
            .filter(entity::login_code::Column::ConsumedAt.is_null())
            .filter(entity::login_code::Column::ExpiresAt.gt(now))
            .one(self.db)
            .await
    }

    pub async fn consume(
        &self,
        login_code: entity::login_code::Model,
        now: NaiveDateTime,
    ) -> Result<entity::login_code::Model, DbErr> {
        let mut login_code_am = login_code.into_active_model();
        login_code_am.consumed_at = ActiveValue::Set(Some(now));

        login_code_am.update(self.db).await
    }

    /// Marks every outstanding code of the user as consumed
    pub async fn invalidate_for_user(&self, user_id: i32, now: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::LoginCode::update_many()
            .set(entity::login_code::ActiveModel {
                consumed_at: ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .filter(entity::login_code::Column::UserId.eq(user_id))
            .filter(entity::login_code::Column::ConsumedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Counts a wrong guess against every outstanding code of the user.
    ///
    /// Codes reaching `max_attempts` failures are consumed so they can no
    /// longer sign in; returns how many were retired this way.
    pub async fn record_failure(
        &self,
        user_id: i32,
        max_attempts: i32,
        now: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        entity::prelude::LoginCode::update_many()
            .col_expr(
                entity::login_code::Column::FailedAttempts,
                Expr::col(entity::login_code::Column::FailedAttempts).add(1),
            )
            .filter(entity::login_code::Column::UserId.eq(user_id))
            .filter(entity::login_code::Column::ConsumedAt.is_null())
            .exec(self.db)
            .await?;

        let result = entity::prelude::LoginCode::update_many()
            .col_expr(entity::login_code::Column::ConsumedAt, Expr::value(Some(now)))
            .filter(entity::login_code::Column::UserId.eq(user_id))
            .filter(entity::login_code::Column::ConsumedAt.is_null())
            .filter(entity::login_code::Column::FailedAttempts.gte(max_attempts))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes consumed codes and codes expired before `now`
    pub async fn purge_stale(&self, now: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::LoginCode::delete_many()
            .filter(
                Condition::any()
                    .add(entity::login_code::Column::ConsumedAt.is_not_null())
                    .add(entity::login_code::Column::ExpiresAt.lte(now)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
