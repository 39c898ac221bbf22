//! In-memory model factories for unit tests that never touch the database.

use chrono::Utc;
use entity::{app_user::Role, property::PropertyType};

use crate::model::{PropertyModel, UserModel};

/// Create a user model with the given id and role.
pub fn mock_user_model(id: i32, role: Role) -> UserModel {
    let now = Utc::now().naive_utc();
    UserModel {
        id,
        email: format!("user{}@example.com", id),
        name: format!("Test {:?}", role),
        role,
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a property model owned by `landlord_id`, optionally managed by `pmc_id`.
pub fn mock_property_model(id: i32, landlord_id: i32, pmc_id: Option<i32>) -> PropertyModel {
    let now = Utc::now().naive_utc();
    PropertyModel {
        id,
        landlord_id,
        pmc_id,
        name: format!("Property {}", id),
        address_line1: "1 Main Street".to_string(),
        address_line2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
        property_type: PropertyType::SingleFamily,
        created_at: now,
        updated_at: now,
    }
}
