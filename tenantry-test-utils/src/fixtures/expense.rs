use chrono::{NaiveDate, Utc};
use entity::expense::ExpenseCategory;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::ExpenseModel, TestContext};

impl TestContext {
    pub fn expense<'a>(&'a self) -> ExpenseFixtures<'a> {
        ExpenseFixtures { setup: self }
    }
}

pub struct ExpenseFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> ExpenseFixtures<'a> {
    pub async fn insert_expense(
        &self,
        property_id: i32,
        recorded_by: i32,
        category: ExpenseCategory,
        amount_cents: i64,
        incurred_on: NaiveDate,
    ) -> Result<ExpenseModel, TestError> {
        Ok(
            entity::prelude::Expense::insert(entity::expense::ActiveModel {
                property_id: ActiveValue::Set(property_id),
                maintenance_request_id: ActiveValue::Set(None),
                category: ActiveValue::Set(category),
                amount_cents: ActiveValue::Set(amount_cents),
                incurred_on: ActiveValue::Set(incurred_on),
                description: ActiveValue::Set(format!("{:?} expense", category)),
                recorded_by: ActiveValue::Set(recorded_by),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
