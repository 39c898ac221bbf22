//! Fetch-or-404 helpers shared by services.

use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        lease::LeaseRepository, property::PropertyRepository, unit::UnitRepository,
        user::UserRepository,
    },
    error::{request::RequestError, Error},
};

pub async fn property<C: ConnectionTrait>(
    db: &C,
    property_id: i32,
) -> Result<entity::property::Model, Error> {
    PropertyRepository::new(db)
        .get(property_id)
        .await?
        .ok_or_else(|| RequestError::NotFound("Property").into())
}

pub async fn unit<C: ConnectionTrait>(db: &C, unit_id: i32) -> Result<entity::unit::Model, Error> {
    UnitRepository::new(db)
        .get(unit_id)
        .await?
        .ok_or_else(|| RequestError::NotFound("Unit").into())
}

/// A lease with its unit and the unit's property
pub async fn lease<C: ConnectionTrait>(
    db: &C,
    lease_id: i32,
) -> Result<
    (
        entity::lease::Model,
        entity::unit::Model,
        entity::property::Model,
    ),
    Error,
> {
    let Some((lease, unit)) = LeaseRepository::new(db).get_with_unit(lease_id).await? else {
        return Err(RequestError::NotFound("Lease").into());
    };
    let property = property(db, unit.property_id).await?;

    Ok((lease, unit, property))
}

pub async fn user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<entity::app_user::Model, Error> {
    UserRepository::new(db)
        .get(user_id)
        .await?
        .ok_or_else(|| RequestError::NotFound("User").into())
}
