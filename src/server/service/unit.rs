//! Units within a property.

use sea_orm::DatabaseConnection;

use crate::{
    model::property::{CreateUnitDto, UnitDto, UpdateUnitDto},
    server::{
        data::{lease::LeaseRepository, unit::UnitRepository},
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, validate},
    },
};

pub struct UnitService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UnitService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_visible(
        &self,
        actor: &Actor,
        property: &entity::property::Model,
    ) -> Result<(), Error> {
        if actor.manages(property) || actor.visible_properties(self.db).await?.allows(property.id)
        {
            return Ok(());
        }

        Err(AuthError::forbidden(format!(
            "User {} cannot view property {}",
            actor.id, property.id
        ))
        .into())
    }

    pub async fn list(&self, actor: &Actor, property_id: i32) -> Result<Vec<UnitDto>, Error> {
        let property = lookup::property(self.db, property_id).await?;
        self.ensure_visible(actor, &property).await?;

        let units = UnitRepository::new(self.db)
            .list_by_property(property.id)
            .await?;

        Ok(units.into_iter().map(UnitDto::from).collect())
    }

    pub async fn create(
        &self,
        actor: &Actor,
        property_id: i32,
        unit: CreateUnitDto,
    ) -> Result<UnitDto, Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_manages(&property)?;

        let unit = CreateUnitDto {
            unit_number: validate::required_text("unit_number", &unit.unit_number)?,
            ..unit
        };
        validate_layout(
            Some(unit.bedrooms),
            Some(unit.bathrooms),
            unit.square_feet,
            Some(unit.market_rent_cents),
        )?;

        let unit_repo = UnitRepository::new(self.db);
        if unit_repo
            .get_by_number(property.id, &unit.unit_number)
            .await?
            .is_some()
        {
            return Err(RequestError::conflict(format!(
                "Unit {} already exists on property {}",
                unit.unit_number, property.id
            ))
            .into());
        }

        let created = unit_repo.create(property.id, unit).await?;

        Ok(created.into())
    }

    pub async fn get(&self, actor: &Actor, unit_id: i32) -> Result<UnitDto, Error> {
        let unit = lookup::unit(self.db, unit_id).await?;
        let property = lookup::property(self.db, unit.property_id).await?;
        self.ensure_visible(actor, &property).await?;

        Ok(unit.into())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        unit_id: i32,
        changes: UpdateUnitDto,
    ) -> Result<UnitDto, Error> {
        let unit = lookup::unit(self.db, unit_id).await?;
        let property = lookup::property(self.db, unit.property_id).await?;
        actor.ensure_manages(&property)?;

        validate_layout(
            changes.bedrooms,
            changes.bathrooms,
            changes.square_feet,
            changes.market_rent_cents,
        )?;

        let unit_number = changes
            .unit_number
            .map(|number| validate::required_text("unit_number", &number))
            .transpose()?;

        let unit_repo = UnitRepository::new(self.db);
        if let Some(unit_number) = &unit_number {
            if let Some(existing) = unit_repo.get_by_number(property.id, unit_number).await? {
                if existing.id != unit.id {
                    return Err(RequestError::conflict(format!(
                        "Unit {} already exists on property {}",
                        unit_number, property.id
                    ))
                    .into());
                }
            }
        }

        let updated = unit_repo
            .update(
                unit,
                UpdateUnitDto {
                    unit_number,
                    ..changes
                },
            )
            .await?;

        Ok(updated.into())
    }

    pub async fn delete(&self, actor: &Actor, unit_id: i32) -> Result<(), Error> {
        let unit = lookup::unit(self.db, unit_id).await?;
        let property = lookup::property(self.db, unit.property_id).await?;
        actor.ensure_manages(&property)?;

        if LeaseRepository::new(self.db)
            .has_active_for_unit(unit.id)
            .await?
        {
            return Err(
                RequestError::conflict(format!("Unit {} has an active lease", unit.id)).into(),
            );
        }

        UnitRepository::new(self.db).delete(unit.id).await?;

        Ok(())
    }
}

fn validate_layout(
    bedrooms: Option<i32>,
    bathrooms: Option<f64>,
    square_feet: Option<i32>,
    market_rent_cents: Option<i64>,
) -> Result<(), Error> {
    if let Some(bedrooms) = bedrooms {
        validate::non_negative("bedrooms", bedrooms.into())?;
    }
    if let Some(bathrooms) = bathrooms {
        if !bathrooms.is_finite() || bathrooms < 0.0 {
            return Err(RequestError::validation("bathrooms must not be negative").into());
        }
    }
    if let Some(square_feet) = square_feet {
        validate::non_negative("square_feet", square_feet.into())?;
    }
    if let Some(market_rent_cents) = market_rent_cents {
        validate::non_negative("market_rent_cents", market_rent_cents)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use entity::unit::UnitStatus;
    use tenantry_test_utils::prelude::*;

    use super::UnitService;
    use crate::{
        model::property::{CreateUnitDto, UpdateUnitDto},
        server::{
            error::{auth::AuthError, request::RequestError, Error},
            service::access::Actor,
        },
    };

    fn new_unit(number: &str) -> CreateUnitDto {
        CreateUnitDto {
            unit_number: number.to_string(),
            bedrooms: 2,
            bathrooms: 1.5,
            square_feet: Some(850),
            market_rent_cents: 140_000,
        }
    }

    /// Expect new units to start vacant and numbers to be unique per property
    #[tokio::test]
    async fn creates_unique_units() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let other_property = test.property().insert_property(landlord.id).await?;
        let service = UnitService::new(&test.db);
        let actor = Actor::from(&landlord);

        let unit = service
            .create(&actor, property.id, new_unit("1A"))
            .await
            .unwrap();
        assert_eq!(unit.status, UnitStatus::Vacant);

        assert!(matches!(
            service.create(&actor, property.id, new_unit(" 1A ")).await,
            Err(Error::RequestError(RequestError::Conflict(_)))
        ));
        assert!(service
            .create(&actor, other_property.id, new_unit("1A"))
            .await
            .is_ok());

        let mut negative = new_unit("2B");
        negative.bedrooms = -1;
        assert!(matches!(
            service.create(&actor, property.id, negative).await,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));

        Ok(())
    }

    /// Expect tenants to be refused unit changes and occupied units to stay
    #[tokio::test]
    async fn guards_updates_and_deletes() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let tenant = test.user().insert_tenant().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        test.lease()
            .insert_active_lease(unit.id, &[tenant.id])
            .await?;
        let service = UnitService::new(&test.db);

        assert!(service.get(&Actor::from(&tenant), unit.id).await.is_ok());
        assert!(matches!(
            service
                .update(
                    &Actor::from(&tenant),
                    unit.id,
                    UpdateUnitDto {
                        bedrooms: Some(3),
                        ..Default::default()
                    }
                )
                .await,
            Err(Error::AuthError(AuthError::Forbidden(_)))
        ));
        assert!(matches!(
            service.delete(&Actor::from(&landlord), unit.id).await,
            Err(Error::RequestError(RequestError::Conflict(_)))
        ));

        Ok(())
    }
}
