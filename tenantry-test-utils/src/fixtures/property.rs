use chrono::Utc;
use entity::{property::PropertyType, unit::UnitStatus};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    error::TestError,
    model::{PropertyModel, UnitModel},
    TestContext,
};

impl TestContext {
    pub fn property<'a>(&'a self) -> PropertyFixtures<'a> {
        PropertyFixtures { setup: self }
    }
}

pub struct PropertyFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> PropertyFixtures<'a> {
    pub async fn insert_property(&self, landlord_id: i32) -> Result<PropertyModel, TestError> {
        self.insert_property_with_pmc(landlord_id, None).await
    }

    pub async fn insert_property_with_pmc(
        &self,
        landlord_id: i32,
        pmc_id: Option<i32>,
    ) -> Result<PropertyModel, TestError> {
        let seq = self.setup.next_sequence();
        let now = Utc::now().naive_utc();
        Ok(
            entity::prelude::Property::insert(entity::property::ActiveModel {
                landlord_id: ActiveValue::Set(landlord_id),
                pmc_id: ActiveValue::Set(pmc_id),
                name: ActiveValue::Set(format!("Property {}", seq)),
                address_line1: ActiveValue::Set(format!("{} Main Street", seq)),
                address_line2: ActiveValue::Set(None),
                city: ActiveValue::Set("Springfield".to_string()),
                state: ActiveValue::Set("IL".to_string()),
                postal_code: ActiveValue::Set("62701".to_string()),
                country: ActiveValue::Set("US".to_string()),
                property_type: ActiveValue::Set(PropertyType::MultiFamily),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a vacant unit with a unique unit number.
    pub async fn insert_unit(&self, property_id: i32) -> Result<UnitModel, TestError> {
        self.insert_unit_with_status(property_id, UnitStatus::Vacant)
            .await
    }

    pub async fn insert_unit_with_status(
        &self,
        property_id: i32,
        status: UnitStatus,
    ) -> Result<UnitModel, TestError> {
        let seq = self.setup.next_sequence();
        let now = Utc::now().naive_utc();
        Ok(entity::prelude::Unit::insert(entity::unit::ActiveModel {
            property_id: ActiveValue::Set(property_id),
            unit_number: ActiveValue::Set(format!("U{}", seq)),
            bedrooms: ActiveValue::Set(2),
            bathrooms: ActiveValue::Set(1.5),
            square_feet: ActiveValue::Set(Some(850)),
            market_rent_cents: ActiveValue::Set(150_000),
            status: ActiveValue::Set(status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?)
    }
}
