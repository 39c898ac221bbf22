use chrono::NaiveDateTime;
use entity::{property::PropertyType, unit::UnitStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyDto {
    pub id: i32,
    pub landlord_id: i32,
    pub pmc_id: Option<i32>,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[schema(value_type = String, example = "multi_family")]
    pub property_type: PropertyType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::property::Model> for PropertyDto {
    fn from(property: entity::property::Model) -> Self {
        Self {
            id: property.id,
            landlord_id: property.landlord_id,
            pmc_id: property.pmc_id,
            name: property.name,
            address_line1: property.address_line1,
            address_line2: property.address_line2,
            city: property.city,
            state: property.state,
            postal_code: property.postal_code,
            country: property.country,
            property_type: property.property_type,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePropertyDto {
    /// Required when an admin creates a property on behalf of a landlord
    pub landlord_id: Option<i32>,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[schema(value_type = String, example = "multi_family")]
    pub property_type: PropertyType,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePropertyDto {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[schema(value_type = Option<String>)]
    pub property_type: Option<PropertyType>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignPmcDto {
    /// PMC user to assign, `null` to remove the current one
    pub pmc_id: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitDto {
    pub id: i32,
    pub property_id: i32,
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_feet: Option<i32>,
    pub market_rent_cents: i64,
    #[schema(value_type = String, example = "vacant")]
    pub status: UnitStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::unit::Model> for UnitDto {
    fn from(unit: entity::unit::Model) -> Self {
        Self {
            id: unit.id,
            property_id: unit.property_id,
            unit_number: unit.unit_number,
            bedrooms: unit.bedrooms,
            bathrooms: unit.bathrooms,
            square_feet: unit.square_feet,
            market_rent_cents: unit.market_rent_cents,
            status: unit.status,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUnitDto {
    pub unit_number: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_feet: Option<i32>,
    pub market_rent_cents: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUnitDto {
    pub unit_number: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<i32>,
    pub market_rent_cents: Option<i64>,
    /// Only `vacant` and `unavailable` can be set directly
    #[schema(value_type = Option<String>)]
    pub status: Option<UnitStatus>,
}
