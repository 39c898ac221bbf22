use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::property::{CreatePropertyDto, UpdatePropertyDto},
    server::data::{fetch_page, Page, Scope},
};

pub struct PropertyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PropertyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        landlord_id: i32,
        property: CreatePropertyDto,
    ) -> Result<entity::property::Model, DbErr> {
        let now = Utc::now().naive_utc();
        entity::property::ActiveModel {
            landlord_id: ActiveValue::Set(landlord_id),
            pmc_id: ActiveValue::Set(None),
            name: ActiveValue::Set(property.name),
            address_line1: ActiveValue::Set(property.address_line1),
            address_line2: ActiveValue::Set(property.address_line2),
            city: ActiveValue::Set(property.city),
            state: ActiveValue::Set(property.state),
            postal_code: ActiveValue::Set(property.postal_code),
            country: ActiveValue::Set(property.country),
            property_type: ActiveValue::Set(property.property_type),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, property_id: i32) -> Result<Option<entity::property::Model>, DbErr> {
        entity::prelude::Property::find_by_id(property_id)
            .one(self.db)
            .await
    }

    /// Lists properties within `scope` ordered by id
    pub async fn list(
        &self,
        scope: &Scope,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::property::Model>, DbErr> {
        let select = scope.apply(
            entity::prelude::Property::find().order_by_asc(entity::property::Column::Id),
            entity::property::Column::Id,
        );

        fetch_page(self.db, select, page, limit).await
    }

    pub async fn count(&self, scope: &Scope) -> Result<u64, DbErr> {
        scope
            .apply(
                entity::prelude::Property::find(),
                entity::property::Column::Id,
            )
            .count(self.db)
            .await
    }

    /// Applies the present fields of `changes`
    pub async fn update(
        &self,
        property: entity::property::Model,
        changes: UpdatePropertyDto,
    ) -> Result<entity::property::Model, DbErr> {
        let mut property_am = property.into_active_model();
        if let Some(name) = changes.name {
            property_am.name = ActiveValue::Set(name);
        }
        if let Some(address_line1) = changes.address_line1 {
            property_am.address_line1 = ActiveValue::Set(address_line1);
        }
        if let Some(address_line2) = changes.address_line2 {
            property_am.address_line2 =
                ActiveValue::Set(Some(address_line2).filter(|line| !line.is_empty()));
        }
        if let Some(city) = changes.city {
            property_am.city = ActiveValue::Set(city);
        }
        if let Some(state) = changes.state {
            property_am.state = ActiveValue::Set(state);
        }
        if let Some(postal_code) = changes.postal_code {
            property_am.postal_code = ActiveValue::Set(postal_code);
        }
        if let Some(country) = changes.country {
            property_am.country = ActiveValue::Set(country);
        }
        if let Some(property_type) = changes.property_type {
            property_am.property_type = ActiveValue::Set(property_type);
        }
        property_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        property_am.update(self.db).await
    }

    pub async fn set_pmc(
        &self,
        property: entity::property::Model,
        pmc_id: Option<i32>,
    ) -> Result<entity::property::Model, DbErr> {
        let mut property_am = property.into_active_model();
        property_am.pmc_id = ActiveValue::Set(pmc_id);
        property_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        property_am.update(self.db).await
    }

    /// Deletes a property; units, documents and expenses cascade
    pub async fn delete(&self, property_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Property::delete_by_id(property_id)
            .exec(self.db)
            .await
    }

    pub async fn ids_by_landlord(&self, landlord_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::Property::find()
            .select_only()
            .column(entity::property::Column::Id)
            .filter(entity::property::Column::LandlordId.eq(landlord_id))
            .order_by_asc(entity::property::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn ids_by_pmc(&self, pmc_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::Property::find()
            .select_only()
            .column(entity::property::Column::Id)
            .filter(entity::property::Column::PmcId.eq(pmc_id))
            .order_by_asc(entity::property::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use tenantry_test_utils::prelude::*;

    use super::PropertyRepository;
    use crate::server::data::Scope;

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_table(entity::prelude::AppUser)
            .with_table(entity::prelude::Property)
            .build()
            .await
    }

    /// Expect scoped listing to return only the landlord's properties
    #[tokio::test]
    async fn list_respects_scope() -> Result<(), TestError> {
        let test = setup().await?;
        let landlord = test.user().insert_landlord().await?;
        let other = test.user().insert_landlord().await?;
        let own = test.property().insert_property(landlord.id).await?;
        test.property().insert_property(other.id).await?;

        let repo = PropertyRepository::new(&test.db);
        let ids = repo.ids_by_landlord(landlord.id).await?;
        let page = repo.list(&Scope::Only(ids), 1, 20).await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, own.id);
        assert_eq!(repo.count(&Scope::All).await?, 2);

        Ok(())
    }

    /// Expect PMC ids to reflect assignment
    #[tokio::test]
    async fn ids_by_pmc_follow_assignment() -> Result<(), TestError> {
        let test = setup().await?;
        let landlord = test.user().insert_landlord().await?;
        let pmc = test.user().insert_pmc().await?;
        let property = test.property().insert_property(landlord.id).await?;

        let repo = PropertyRepository::new(&test.db);
        assert!(repo.ids_by_pmc(pmc.id).await?.is_empty());

        repo.set_pmc(property.clone(), Some(pmc.id)).await?;

        assert_eq!(repo.ids_by_pmc(pmc.id).await?, vec![property.id]);

        Ok(())
    }

    /// Expect deleting a missing property to affect no rows
    #[tokio::test]
    async fn delete_missing_property() -> Result<(), TestError> {
        let test = setup().await?;

        let result = PropertyRepository::new(&test.db).delete(1).await?;

        assert_eq!(result.rows_affected, 0);

        Ok(())
    }
}
