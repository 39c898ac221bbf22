//! Properties and PMC assignment.

use entity::{app_user::Role, notification::NotificationKind};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::PageQuery,
        property::{CreatePropertyDto, PropertyDto, UpdatePropertyDto},
    },
    server::{
        data::{lease::LeaseRepository, property::PropertyRepository, user::UserRepository, Page},
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, notification::notify, validate},
    },
};

pub struct PropertyService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PropertyService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, actor: &Actor, page: PageQuery) -> Result<Page<PropertyDto>, Error> {
        let scope = actor.visible_properties(self.db).await?;
        let properties = PropertyRepository::new(self.db)
            .list(&scope, page.page(), page.limit())
            .await?;

        Ok(properties.map(PropertyDto::from))
    }

    /// Landlords create properties for themselves; admins name the landlord
    pub async fn create(
        &self,
        actor: &Actor,
        property: CreatePropertyDto,
    ) -> Result<PropertyDto, Error> {
        let landlord_id = match actor.role {
            Role::Landlord => match property.landlord_id {
                Some(landlord_id) if landlord_id != actor.id => {
                    return Err(AuthError::forbidden(
                        "Landlords can only create properties for themselves",
                    )
                    .into())
                }
                _ => actor.id,
            },
            Role::Admin => {
                let Some(landlord_id) = property.landlord_id else {
                    return Err(RequestError::validation("landlord_id is required").into());
                };
                let landlord = UserRepository::new(self.db).get(landlord_id).await?;
                if landlord.map(|user| user.role) != Some(Role::Landlord) {
                    return Err(RequestError::validation(format!(
                        "User {} is not a landlord",
                        landlord_id
                    ))
                    .into());
                }
                landlord_id
            }
            _ => {
                return Err(
                    AuthError::forbidden("Only landlords and admins can create properties").into(),
                )
            }
        };

        let property = CreatePropertyDto {
            landlord_id: Some(landlord_id),
            name: validate::required_text("name", &property.name)?,
            address_line1: validate::required_text("address_line1", &property.address_line1)?,
            address_line2: validate::optional_text(property.address_line2),
            city: validate::required_text("city", &property.city)?,
            state: validate::required_text("state", &property.state)?,
            postal_code: validate::required_text("postal_code", &property.postal_code)?,
            country: validate::required_text("country", &property.country)?,
            property_type: property.property_type,
        };

        let created = PropertyRepository::new(self.db)
            .create(landlord_id, property)
            .await?;

        tracing::info!("User {} created property {}", actor.id, created.id);

        Ok(created.into())
    }

    pub async fn get(&self, actor: &Actor, property_id: i32) -> Result<PropertyDto, Error> {
        let property = lookup::property(self.db, property_id).await?;

        if !actor.manages(&property) && !actor.visible_properties(self.db).await?.allows(property.id)
        {
            return Err(AuthError::forbidden(format!(
                "User {} cannot view property {}",
                actor.id, property.id
            ))
            .into());
        }

        Ok(property.into())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        property_id: i32,
        changes: UpdatePropertyDto,
    ) -> Result<PropertyDto, Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_manages(&property)?;

        let required = |field: &str, value: Option<String>| {
            value
                .map(|value| validate::required_text(field, &value))
                .transpose()
        };
        let changes = UpdatePropertyDto {
            name: required("name", changes.name)?,
            address_line1: required("address_line1", changes.address_line1)?,
            address_line2: changes.address_line2.map(|line| line.trim().to_string()),
            city: required("city", changes.city)?,
            state: required("state", changes.state)?,
            postal_code: required("postal_code", changes.postal_code)?,
            country: required("country", changes.country)?,
            property_type: changes.property_type,
        };

        let updated = PropertyRepository::new(self.db)
            .update(property, changes)
            .await?;

        Ok(updated.into())
    }

    /// Deletes a property without active leases; owner only
    pub async fn delete(&self, actor: &Actor, property_id: i32) -> Result<(), Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_owns(&property)?;

        if LeaseRepository::new(self.db)
            .has_active_for_property(property.id)
            .await?
        {
            return Err(RequestError::conflict(format!(
                "Property {} has an active lease",
                property.id
            ))
            .into());
        }

        PropertyRepository::new(self.db).delete(property.id).await?;

        tracing::info!("User {} deleted property {}", actor.id, property.id);

        Ok(())
    }

    /// Assigns or clears the managing PMC; owner only
    pub async fn assign_pmc(
        &self,
        actor: &Actor,
        property_id: i32,
        pmc_id: Option<i32>,
    ) -> Result<PropertyDto, Error> {
        let property = lookup::property(self.db, property_id).await?;
        actor.ensure_owns(&property)?;

        if let Some(pmc_id) = pmc_id {
            let pmc = UserRepository::new(self.db).get(pmc_id).await?;
            if pmc.map(|user| user.role) != Some(Role::Pmc) {
                return Err(
                    RequestError::validation(format!("User {} is not a PMC", pmc_id)).into(),
                );
            }
        }

        let updated = PropertyRepository::new(self.db)
            .set_pmc(property, pmc_id)
            .await?;

        if let Some(pmc_id) = pmc_id {
            notify(
                self.db,
                &[pmc_id],
                Some(actor.id),
                NotificationKind::PmcAssigned,
                "New property assignment",
                format!("You now manage {}", updated.name),
                Some(format!("/properties/{}", updated.id)),
            )
            .await?;
        }

        Ok(updated.into())
    }
}
