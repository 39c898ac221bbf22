use chrono::{NaiveDate, Utc};
use entity::lease::LeaseStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::data::{fetch_page, Page, Scope};

/// Values of a lease as written by create and update
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaseTerms {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub rent_due_day: i32,
}

/// Filters for listing leases
#[derive(Clone, Debug)]
pub struct LeaseFilter {
    /// Restricts the property of the lease's unit
    pub properties: Scope,
    /// Restricts the lease ids
    pub leases: Scope,
    pub property_id: Option<i32>,
    pub status: Option<LeaseStatus>,
}

pub struct LeaseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LeaseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a draft lease
    pub async fn create(
        &self,
        unit_id: i32,
        terms: LeaseTerms,
    ) -> Result<entity::lease::Model, DbErr> {
        let now = Utc::now().naive_utc();
        entity::lease::ActiveModel {
            unit_id: ActiveValue::Set(unit_id),
            start_date: ActiveValue::Set(terms.start_date),
            end_date: ActiveValue::Set(terms.end_date),
            rent_cents: ActiveValue::Set(terms.rent_cents),
            deposit_cents: ActiveValue::Set(terms.deposit_cents),
            rent_due_day: ActiveValue::Set(terms.rent_due_day),
            status: ActiveValue::Set(LeaseStatus::Draft),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, lease_id: i32) -> Result<Option<entity::lease::Model>, DbErr> {
        entity::prelude::Lease::find_by_id(lease_id)
            .one(self.db)
            .await
    }

    /// Fetches a lease together with its unit
    pub async fn get_with_unit(
        &self,
        lease_id: i32,
    ) -> Result<Option<(entity::lease::Model, entity::unit::Model)>, DbErr> {
        let result = entity::prelude::Lease::find_by_id(lease_id)
            .find_also_related(entity::prelude::Unit)
            .one(self.db)
            .await?;

        Ok(result.and_then(|(lease, unit)| unit.map(|unit| (lease, unit))))
    }

    pub async fn get_many_with_units(
        &self,
        lease_ids: &[i32],
    ) -> Result<Vec<(entity::lease::Model, entity::unit::Model)>, DbErr> {
        let rows = entity::prelude::Lease::find()
            .filter(entity::lease::Column::Id.is_in(lease_ids.iter().copied()))
            .find_also_related(entity::prelude::Unit)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(lease, unit)| unit.map(|unit| (lease, unit)))
            .collect())
    }

    pub async fn list(
        &self,
        filter: &LeaseFilter,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::lease::Model>, DbErr> {
        let mut select = entity::prelude::Lease::find()
            .inner_join(entity::prelude::Unit)
            .order_by_desc(entity::lease::Column::StartDate)
            .order_by_asc(entity::lease::Column::Id);
        select = filter
            .properties
            .apply(select, entity::unit::Column::PropertyId);
        select = filter.leases.apply(select, entity::lease::Column::Id);
        if let Some(property_id) = filter.property_id {
            select = select.filter(entity::unit::Column::PropertyId.eq(property_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(entity::lease::Column::Status.eq(status));
        }

        fetch_page(self.db, select, page, limit).await
    }

    /// Ids of leases on units of properties in `scope`
    pub async fn ids_for_properties(&self, scope: &Scope) -> Result<Vec<i32>, DbErr> {
        scope
            .apply(
                entity::prelude::Lease::find().inner_join(entity::prelude::Unit),
                entity::unit::Column::PropertyId,
            )
            .select_only()
            .column(entity::lease::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn update_terms(
        &self,
        lease: entity::lease::Model,
        terms: LeaseTerms,
    ) -> Result<entity::lease::Model, DbErr> {
        let mut lease_am = lease.into_active_model();
        lease_am.start_date = ActiveValue::Set(terms.start_date);
        lease_am.end_date = ActiveValue::Set(terms.end_date);
        lease_am.rent_cents = ActiveValue::Set(terms.rent_cents);
        lease_am.deposit_cents = ActiveValue::Set(terms.deposit_cents);
        lease_am.rent_due_day = ActiveValue::Set(terms.rent_due_day);
        lease_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        lease_am.update(self.db).await
    }

    pub async fn set_status(
        &self,
        lease: entity::lease::Model,
        status: LeaseStatus,
    ) -> Result<entity::lease::Model, DbErr> {
        let mut lease_am = lease.into_active_model();
        lease_am.status = ActiveValue::Set(status);
        lease_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        lease_am.update(self.db).await
    }

    /// Draft or active leases on the unit whose dates intersect `[start, end]`
    pub async fn find_overlapping(
        &self,
        unit_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_lease_id: Option<i32>,
    ) -> Result<Vec<entity::lease::Model>, DbErr> {
        let mut select = entity::prelude::Lease::find()
            .filter(entity::lease::Column::UnitId.eq(unit_id))
            .filter(
                entity::lease::Column::Status.is_in([LeaseStatus::Draft, LeaseStatus::Active]),
            )
            .filter(entity::lease::Column::StartDate.lte(end_date))
            .filter(entity::lease::Column::EndDate.gte(start_date));
        if let Some(lease_id) = exclude_lease_id {
            select = select.filter(entity::lease::Column::Id.ne(lease_id));
        }

        select.all(self.db).await
    }

    pub async fn has_active_for_unit(&self, unit_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Lease::find()
            .filter(entity::lease::Column::UnitId.eq(unit_id))
            .filter(entity::lease::Column::Status.eq(LeaseStatus::Active))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn has_active_for_property(&self, property_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Lease::find()
            .inner_join(entity::prelude::Unit)
            .filter(entity::unit::Column::PropertyId.eq(property_id))
            .filter(entity::lease::Column::Status.eq(LeaseStatus::Active))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Active leases whose end date is before `today`
    pub async fn find_ended(&self, today: NaiveDate) -> Result<Vec<entity::lease::Model>, DbErr> {
        entity::prelude::Lease::find()
            .filter(entity::lease::Column::Status.eq(LeaseStatus::Active))
            .filter(entity::lease::Column::EndDate.lt(today))
            .all(self.db)
            .await
    }

    pub async fn count(&self, leases: &Scope, status: Option<LeaseStatus>) -> Result<u64, DbErr> {
        let mut select = leases.apply(entity::prelude::Lease::find(), entity::lease::Column::Id);
        if let Some(status) = status {
            select = select.filter(entity::lease::Column::Status.eq(status));
        }

        select.count(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entity::lease::LeaseStatus;
    use tenantry_test_utils::prelude::*;

    use super::{LeaseFilter, LeaseRepository};
    use crate::server::data::Scope;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_table(entity::prelude::AppUser)
            .with_table(entity::prelude::Property)
            .with_table(entity::prelude::Unit)
            .with_table(entity::prelude::Lease)
            .with_table(entity::prelude::LeaseTenant)
            .build()
            .await
    }

    /// Expect overlap detection to ignore terminated leases and touch boundaries
    #[tokio::test]
    async fn finds_overlapping_leases() -> Result<(), TestError> {
        let test = setup().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let active = test
            .lease()
            .insert_lease(
                unit.id,
                &[],
                LeaseStatus::Active,
                date(2026, 1, 1),
                date(2026, 12, 31),
            )
            .await?;
        test.lease()
            .insert_lease(
                unit.id,
                &[],
                LeaseStatus::Terminated,
                date(2027, 1, 1),
                date(2027, 12, 31),
            )
            .await?;

        let repo = LeaseRepository::new(&test.db);

        let overlapping = repo
            .find_overlapping(unit.id, date(2026, 12, 31), date(2027, 6, 30), None)
            .await?;
        assert_eq!(overlapping.len(), 1);
        assert_eq!(overlapping[0].id, active.id);

        let clear = repo
            .find_overlapping(unit.id, date(2027, 1, 1), date(2027, 6, 30), None)
            .await?;
        assert!(clear.is_empty());

        let excluded = repo
            .find_overlapping(unit.id, date(2026, 3, 1), date(2026, 4, 1), Some(active.id))
            .await?;
        assert!(excluded.is_empty());

        Ok(())
    }

    /// Expect listing to honour property scope and status filter
    #[tokio::test]
    async fn list_filters_by_property_scope() -> Result<(), TestError> {
        let test = setup().await?;
        let landlord = test.user().insert_landlord().await?;
        let other = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let other_property = test.property().insert_property(other.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let other_unit = test.property().insert_unit(other_property.id).await?;
        let lease = test.lease().insert_active_lease(unit.id, &[]).await?;
        test.lease().insert_active_lease(other_unit.id, &[]).await?;

        let repo = LeaseRepository::new(&test.db);
        let filter = LeaseFilter {
            properties: Scope::Only(vec![property.id]),
            leases: Scope::All,
            property_id: None,
            status: Some(LeaseStatus::Active),
        };
        let page = repo.list(&filter, 1, 20).await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, lease.id);
        assert_eq!(
            repo.ids_for_properties(&Scope::Only(vec![property.id]))
                .await?,
            vec![lease.id]
        );
        assert!(repo.has_active_for_property(property.id).await?);

        Ok(())
    }
}
