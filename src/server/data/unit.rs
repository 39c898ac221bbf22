use chrono::Utc;
use entity::unit::UnitStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{
    model::property::{CreateUnitDto, UpdateUnitDto},
    server::data::Scope,
};

pub struct UnitRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UnitRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a vacant unit
    pub async fn create(
        &self,
        property_id: i32,
        unit: CreateUnitDto,
    ) -> Result<entity::unit::Model, DbErr> {
        let now = Utc::now().naive_utc();
        entity::unit::ActiveModel {
            property_id: ActiveValue::Set(property_id),
            unit_number: ActiveValue::Set(unit.unit_number),
            bedrooms: ActiveValue::Set(unit.bedrooms),
            bathrooms: ActiveValue::Set(unit.bathrooms),
            square_feet: ActiveValue::Set(unit.square_feet),
            market_rent_cents: ActiveValue::Set(unit.market_rent_cents),
            status: ActiveValue::Set(UnitStatus::Vacant),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, unit_id: i32) -> Result<Option<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find_by_id(unit_id).one(self.db).await
    }

    pub async fn get_by_number(
        &self,
        property_id: i32,
        unit_number: &str,
    ) -> Result<Option<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find()
            .filter(entity::unit::Column::PropertyId.eq(property_id))
            .filter(entity::unit::Column::UnitNumber.eq(unit_number))
            .one(self.db)
            .await
    }

    pub async fn list_by_property(
        &self,
        property_id: i32,
    ) -> Result<Vec<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find()
            .filter(entity::unit::Column::PropertyId.eq(property_id))
            .order_by_asc(entity::unit::Column::UnitNumber)
            .all(self.db)
            .await
    }

    pub async fn get_many(&self, unit_ids: &[i32]) -> Result<Vec<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find()
            .filter(entity::unit::Column::Id.is_in(unit_ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Counts units of properties in `scope`, optionally only those with `status`
    pub async fn count(&self, scope: &Scope, status: Option<UnitStatus>) -> Result<u64, DbErr> {
        let mut select = scope.apply(
            entity::prelude::Unit::find(),
            entity::unit::Column::PropertyId,
        );
        if let Some(status) = status {
            select = select.filter(entity::unit::Column::Status.eq(status));
        }

        select.count(self.db).await
    }

    /// Applies the present fields of `changes`
    pub async fn update(
        &self,
        unit: entity::unit::Model,
        changes: UpdateUnitDto,
    ) -> Result<entity::unit::Model, DbErr> {
        let mut unit_am = unit.into_active_model();
        if let Some(unit_number) = changes.unit_number {
            unit_am.unit_number = ActiveValue::Set(unit_number);
        }
        if let Some(bedrooms) = changes.bedrooms {
            unit_am.bedrooms = ActiveValue::Set(bedrooms);
        }
        if let Some(bathrooms) = changes.bathrooms {
            unit_am.bathrooms = ActiveValue::Set(bathrooms);
        }
        if let Some(square_feet) = changes.square_feet {
            unit_am.square_feet = ActiveValue::Set(Some(square_feet));
        }
        if let Some(market_rent_cents) = changes.market_rent_cents {
            unit_am.market_rent_cents = ActiveValue::Set(market_rent_cents);
        }
        if let Some(status) = changes.status {
            unit_am.status = ActiveValue::Set(status);
        }
        unit_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        unit_am.update(self.db).await
    }

    pub async fn set_status(&self, unit_id: i32, status: UnitStatus) -> Result<u64, DbErr> {
        let result = entity::prelude::Unit::update_many()
            .set(entity::unit::ActiveModel {
                status: ActiveValue::Set(status),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .filter(entity::unit::Column::Id.eq(unit_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, unit_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Unit::delete_by_id(unit_id)
            .exec(self.db)
            .await
    }
}
