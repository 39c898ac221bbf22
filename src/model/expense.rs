use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use entity::expense::ExpenseCategory;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseDto {
    pub id: i32,
    pub property_id: i32,
    pub maintenance_request_id: Option<i32>,
    #[schema(value_type = String, example = "repairs")]
    pub category: ExpenseCategory,
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
    pub description: String,
    pub recorded_by: i32,
    pub created_at: NaiveDateTime,
}

impl From<entity::expense::Model> for ExpenseDto {
    fn from(expense: entity::expense::Model) -> Self {
        Self {
            id: expense.id,
            property_id: expense.property_id,
            maintenance_request_id: expense.maintenance_request_id,
            category: expense.category,
            amount_cents: expense.amount_cents,
            incurred_on: expense.incurred_on,
            description: expense.description,
            recorded_by: expense.recorded_by,
            created_at: expense.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateExpenseDto {
    #[schema(value_type = String, example = "repairs")]
    pub category: ExpenseCategory,
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
    pub description: String,
    pub maintenance_request_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseListQuery {
    /// Inclusive lower bound on `incurred_on`
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `incurred_on`
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseSummaryDto {
    pub total_cents: i64,
    /// Total per category, keyed by category name
    pub by_category: BTreeMap<String, i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseReportDto {
    pub expenses: Vec<ExpenseDto>,
    pub summary: ExpenseSummaryDto,
}
