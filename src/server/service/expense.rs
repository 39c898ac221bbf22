//! Property expenses and their per-category summary.

use std::collections::BTreeMap;

use sea_orm::{ActiveEnum, DatabaseConnection};

use crate::{
    model::expense::{
        CreateExpenseDto, ExpenseDto, ExpenseListQuery, ExpenseReportDto, ExpenseSummaryDto,
    },
    server::{
        data::{
            expense::{ExpenseRepository, NewExpense},
            maintenance::MaintenanceRepository,
        },
        error::{request::RequestError, Error},
        service::{access::Actor, lookup, validate},
        util::money,
    },
};

pub struct ExpenseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ExpenseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Expenses of a managed property within the optional date range, with totals
    pub async fn report(
        &self,
        actor: &Actor,
        property_id: i32,
        query: ExpenseListQuery,
    ) -> Result<ExpenseReportDto, Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_manages(&property)?;

        let expenses = ExpenseRepository::new(self.db)
            .list_by_property(property.id, query.from, query.to)
            .await?;

        Ok(ExpenseReportDto {
            summary: summarize(&expenses)?,
            expenses: expenses.into_iter().map(ExpenseDto::from).collect(),
        })
    }

    pub async fn create(
        &self,
        actor: &Actor,
        property_id: i32,
        expense: CreateExpenseDto,
    ) -> Result<ExpenseDto, Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_manages(&property)?;

        validate::positive("amount_cents", expense.amount_cents)?;
        let description = validate::required_text("description", &expense.description)?;

        if let Some(request_id) = expense.maintenance_request_id {
            let request = MaintenanceRepository::new(self.db).get(request_id).await?;
            if request.is_none_or(|request| request.property_id != property.id) {
                return Err(RequestError::validation(format!(
                    "Maintenance request {} does not belong to property {}",
                    request_id, property.id
                ))
                .into());
            }
        }

        let created = ExpenseRepository::new(self.db)
            .create(NewExpense {
                property_id: property.id,
                maintenance_request_id: expense.maintenance_request_id,
                category: expense.category,
                amount_cents: expense.amount_cents,
                incurred_on: expense.incurred_on,
                description,
                recorded_by: actor.id,
            })
            .await?;

        Ok(ExpenseDto::from(created))
    }

    pub async fn delete(&self, actor: &Actor, expense_id: i32) -> Result<(), Error> {
        let expense_repo = ExpenseRepository::new(self.db);
        let expense = expense_repo
            .get(expense_id)
            .await?
            .ok_or(RequestError::NotFound("Expense"))?;
        let property = lookup::property(self.db, expense.property_id).await?;
        actor.ensure_manages(&property)?;

        expense_repo.delete(expense.id).await?;

        Ok(())
    }
}

fn summarize(expenses: &[entity::expense::Model]) -> Result<ExpenseSummaryDto, Error> {
    let mut by_category = BTreeMap::new();
    for expense in expenses {
        let total = by_category.entry(expense.category.to_value()).or_insert(0);
        *total = money::total_cents([*total, expense.amount_cents])?;
    }

    Ok(ExpenseSummaryDto {
        total_cents: money::total_cents(expenses.iter().map(|expense| expense.amount_cents))?,
        by_category,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entity::{expense::ExpenseCategory, maintenance_request::Priority};
    use tenantry_test_utils::prelude::*;

    use super::ExpenseService;
    use crate::{
        model::expense::{CreateExpenseDto, ExpenseListQuery},
        server::{
            error::{auth::AuthError, request::RequestError, Error},
            service::access::Actor,
        },
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    /// Expect totals per category over the requested range only
    #[tokio::test]
    async fn summarizes_by_category() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        for (category, amount, day) in [
            (ExpenseCategory::Repairs, 12_000, 3),
            (ExpenseCategory::Repairs, 8_000, 10),
            (ExpenseCategory::Utilities, 5_500, 15),
            (ExpenseCategory::Taxes, 90_000, 28),
        ] {
            test.expense()
                .insert_expense(property.id, landlord.id, category, amount, date(day))
                .await?;
        }
        let service = ExpenseService::new(&test.db);

        let report = service
            .report(
                &Actor::from(&landlord),
                property.id,
                ExpenseListQuery {
                    from: Some(date(1)),
                    to: Some(date(15)),
                },
            )
            .await
            .unwrap();

        assert_eq!(report.expenses.len(), 3);
        assert_eq!(report.summary.total_cents, 25_500);
        assert_eq!(report.summary.by_category.get("repairs"), Some(&20_000));
        assert_eq!(report.summary.by_category.get("utilities"), Some(&5_500));
        assert!(!report.summary.by_category.contains_key("taxes"));

        Ok(())
    }

    /// Expect a 400 instead of a wrapped total when amounts overflow
    #[tokio::test]
    async fn rejects_overflowing_totals() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        for day in [4, 5] {
            test.expense()
                .insert_expense(
                    property.id,
                    landlord.id,
                    ExpenseCategory::Repairs,
                    i64::MAX / 2 + 1,
                    date(day),
                )
                .await?;
        }

        let result = ExpenseService::new(&test.db)
            .report(
                &Actor::from(&landlord),
                property.id,
                ExpenseListQuery {
                    from: None,
                    to: None,
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));

        Ok(())
    }

    /// Expect positive amounts and requests from the same property
    #[tokio::test]
    async fn validates_new_expenses() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let tenant = test.user().insert_tenant().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let other_property = test.property().insert_property(landlord.id).await?;
        let foreign_request = test
            .maintenance()
            .insert_request(other_property.id, None, landlord.id, Priority::Low)
            .await?;
        let service = ExpenseService::new(&test.db);
        let actor = Actor::from(&landlord);
        let expense = |amount_cents, maintenance_request_id| CreateExpenseDto {
            category: ExpenseCategory::Repairs,
            amount_cents,
            incurred_on: date(2),
            description: "Replaced water heater".to_string(),
            maintenance_request_id,
        };

        assert!(matches!(
            service.create(&actor, property.id, expense(0, None)).await,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));
        assert!(matches!(
            service
                .create(&actor, property.id, expense(10_000, Some(foreign_request.id)))
                .await,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));
        assert!(matches!(
            service
                .create(&Actor::from(&tenant), property.id, expense(10_000, None))
                .await,
            Err(Error::AuthError(AuthError::Forbidden(_)))
        ));

        let created = service
            .create(&actor, property.id, expense(10_000, None))
            .await
            .unwrap();
        service.delete(&actor, created.id).await.unwrap();
        assert!(matches!(
            service.delete(&actor, created.id).await,
            Err(Error::RequestError(RequestError::NotFound(_)))
        ));

        Ok(())
    }
}
