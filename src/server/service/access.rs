//! Role-based access checks.
//!
//! An [`Actor`] is the signed-in user reduced to what access decisions need.
//! Ownership checks are synchronous against already-loaded rows; listing
//! scopes resolve the ids an actor may see with a few queries.

use entity::app_user::Role;
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        lease::LeaseRepository, lease_tenant::LeaseTenantRepository,
        maintenance::MaintenanceRepository, property::PropertyRepository, Scope,
    },
    error::{auth::AuthError, Error},
};

/// The caller of a service operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub role: Role,
}

impl From<&entity::app_user::Model> for Actor {
    fn from(user: &entity::app_user::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

impl Actor {
    pub fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admin, the property's landlord or its PMC
    pub fn manages(&self, property: &entity::property::Model) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Landlord => property.landlord_id == self.id,
            Role::Pmc => property.pmc_id == Some(self.id),
            Role::Tenant | Role::Vendor => false,
        }
    }

    /// Admin or the property's landlord
    pub fn owns(&self, property: &entity::property::Model) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Landlord => property.landlord_id == self.id,
            _ => false,
        }
    }

    pub fn ensure_manages(&self, property: &entity::property::Model) -> Result<(), Error> {
        if self.manages(property) {
            return Ok(());
        }

        Err(AuthError::forbidden(format!(
            "User {} does not manage property {}",
            self.id, property.id
        ))
        .into())
    }

    pub fn ensure_owns(&self, property: &entity::property::Model) -> Result<(), Error> {
        if self.owns(property) {
            return Ok(());
        }

        Err(AuthError::forbidden(format!(
            "User {} does not own property {}",
            self.id, property.id
        ))
        .into())
    }

    pub fn ensure_role(&self, roles: &[Role]) -> Result<(), Error> {
        if roles.contains(&self.role) {
            return Ok(());
        }

        Err(AuthError::forbidden(format!(
            "Role {:?} may not perform this action",
            self.role
        ))
        .into())
    }

    /// Properties the actor manages
    pub async fn managed_properties<C: ConnectionTrait>(&self, db: &C) -> Result<Scope, Error> {
        let property_repo = PropertyRepository::new(db);

        let scope = match self.role {
            Role::Admin => Scope::All,
            Role::Landlord => Scope::Only(property_repo.ids_by_landlord(self.id).await?),
            Role::Pmc => Scope::Only(property_repo.ids_by_pmc(self.id).await?),
            Role::Tenant | Role::Vendor => Scope::Only(Vec::new()),
        };

        Ok(scope)
    }

    /// Properties the actor may list: managed ones, leased ones for tenants,
    /// assigned ones for vendors
    pub async fn visible_properties<C: ConnectionTrait>(&self, db: &C) -> Result<Scope, Error> {
        match self.role {
            Role::Tenant => {
                let lease_ids = LeaseTenantRepository::new(db)
                    .lease_ids_for_tenant(self.id)
                    .await?;
                let mut property_ids: Vec<i32> = LeaseRepository::new(db)
                    .get_many_with_units(&lease_ids)
                    .await?
                    .into_iter()
                    .map(|(_, unit)| unit.property_id)
                    .collect();
                property_ids.sort_unstable();
                property_ids.dedup();

                Ok(Scope::Only(property_ids))
            }
            Role::Vendor => Ok(Scope::Only(
                MaintenanceRepository::new(db)
                    .property_ids_for_vendor(self.id)
                    .await?,
            )),
            _ => self.managed_properties(db).await,
        }
    }

    /// Leases the actor may see: leases on managed properties, or the tenant's own
    pub async fn visible_leases<C: ConnectionTrait>(&self, db: &C) -> Result<Scope, Error> {
        let scope = match self.role {
            Role::Admin => Scope::All,
            Role::Landlord | Role::Pmc => {
                let properties = self.managed_properties(db).await?;
                Scope::Only(
                    LeaseRepository::new(db)
                        .ids_for_properties(&properties)
                        .await?,
                )
            }
            Role::Tenant => Scope::Only(
                LeaseTenantRepository::new(db)
                    .lease_ids_for_tenant(self.id)
                    .await?,
            ),
            Role::Vendor => Scope::Only(Vec::new()),
        };

        Ok(scope)
    }

    /// Whether the actor is a tenant party of the lease
    pub async fn is_lease_party<C: ConnectionTrait>(
        &self,
        db: &C,
        lease_id: i32,
    ) -> Result<bool, Error> {
        if self.role != Role::Tenant {
            return Ok(false);
        }

        Ok(LeaseTenantRepository::new(db)
            .is_party(lease_id, self.id)
            .await?)
    }
}
