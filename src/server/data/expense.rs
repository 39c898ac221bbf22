use chrono::{NaiveDate, Utc};
use entity::expense::ExpenseCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Clone, Debug)]
pub struct NewExpense {
    pub property_id: i32,
    pub maintenance_request_id: Option<i32>,
    pub category: ExpenseCategory,
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
    pub description: String,
    pub recorded_by: i32,
}

pub struct ExpenseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ExpenseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, expense: NewExpense) -> Result<entity::expense::Model, DbErr> {
        entity::expense::ActiveModel {
            property_id: ActiveValue::Set(expense.property_id),
            maintenance_request_id: ActiveValue::Set(expense.maintenance_request_id),
            category: ActiveValue::Set(expense.category),
            amount_cents: ActiveValue::Set(expense.amount_cents),
            incurred_on: ActiveValue::Set(expense.incurred_on),
            description: ActiveValue::Set(expense.description),
            recorded_by: ActiveValue::Set(expense.recorded_by),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, expense_id: i32) -> Result<Option<entity::expense::Model>, DbErr> {
        entity::prelude::Expense::find_by_id(expense_id)
            .one(self.db)
            .await
    }

    /// Expenses of the property incurred within the optional inclusive date range
    pub async fn list_by_property(
        &self,
        property_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<entity::expense::Model>, DbErr> {
        let mut select = entity::prelude::Expense::find()
            .filter(entity::expense::Column::PropertyId.eq(property_id))
            .order_by_desc(entity::expense::Column::IncurredOn)
            .order_by_desc(entity::expense::Column::Id);
        if let Some(from) = from {
            select = select.filter(entity::expense::Column::IncurredOn.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(entity::expense::Column::IncurredOn.lte(to));
        }

        select.all(self.db).await
    }

    pub async fn delete(&self, expense_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Expense::delete_by_id(expense_id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
