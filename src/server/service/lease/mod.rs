//! Leases: drafting, activation with rent schedule generation, termination
//! and the tenant roster.


use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use entity::{
    app_user::Role, lease::LeaseStatus, notification::NotificationKind, unit::UnitStatus,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::lease::{CreateLeaseDto, LeaseDto, LeaseListQuery, UpdateLeaseDto},
    server::{
        data::{
            lease::{LeaseFilter, LeaseRepository, LeaseTerms},
            lease_tenant::LeaseTenantRepository,
            rent_payment::RentPaymentRepository,
            unit::UnitRepository,
            user::UserRepository,
            Page, Scope,
        },
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, notification::notify, validate},
        util::time::rent_schedule,
    },
};

pub struct LeaseService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LeaseService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, actor: &Actor, query: LeaseListQuery) -> Result<Page<LeaseDto>, Error> {
        let page = query.page_query();
        let filter = LeaseFilter {
            properties: Scope::All,
            leases: actor.visible_leases(self.db).await?,
            property_id: query.property_id,
            status: query.status,
        };

        let leases = LeaseRepository::new(self.db)
            .list(&filter, page.page(), page.limit())
            .await?;

        let lease_ids: Vec<i32> = leases.items.iter().map(|lease| lease.id).collect();
        let property_ids: HashMap<i32, i32> = LeaseRepository::new(self.db)
            .get_many_with_units(&lease_ids)
            .await?
            .into_iter()
            .map(|(lease, unit)| (lease.id, unit.property_id))
            .collect();
        let mut tenants: HashMap<i32, Vec<i32>> = HashMap::new();
        for (lease_id, tenant_id) in LeaseTenantRepository::new(self.db)
            .pairs_for_leases(&lease_ids)
            .await?
        {
            tenants.entry(lease_id).or_default().push(tenant_id);
        }

        Ok(leases.map(|lease| {
            let property_id = property_ids.get(&lease.id).copied().unwrap_or_default();
            let tenant_ids = tenants.remove(&lease.id).unwrap_or_default();
            LeaseDto::new(lease, property_id, tenant_ids)
        }))
    }

    /// Gets a lease visible to managers of its property and its tenants
    pub async fn get(&self, actor: &Actor, lease_id: i32) -> Result<LeaseDto, Error> {
        let (lease, _, property) = lookup::lease(self.db, lease_id).await?;

        if !actor.manages(&property) && !actor.is_lease_party(self.db, lease.id).await? {
            return Err(AuthError::forbidden(format!(
                "User {} cannot view lease {}",
                actor.id, lease.id
            ))
            .into());
        }

        self.to_dto(lease, property.id).await
    }

    /// Drafts a lease for a unit of a managed property
    pub async fn create(&self, actor: &Actor, lease: CreateLeaseDto) -> Result<LeaseDto, Error> {
        let unit = lookup::unit(self.db, lease.unit_id).await?;
        let property = lookup::property(self.db, unit.property_id).await?;
        actor.ensure_manages(&property)?;

        let terms = LeaseTerms {
            start_date: lease.start_date,
            end_date: lease.end_date,
            rent_cents: lease.rent_cents,
            deposit_cents: lease.deposit_cents,
            rent_due_day: lease.rent_due_day,
        };
        validate_terms(&terms)?;
        let tenant_ids = self.validate_tenants(&lease.tenant_ids).await?;
        ensure_no_overlap(self.db, unit.id, &terms, None).await?;

        let txn = self.db.begin().await?;
        let created = LeaseRepository::new(&txn).create(unit.id, terms).await?;
        let lease_tenant_repo = LeaseTenantRepository::new(&txn);
        for tenant_id in &tenant_ids {
            lease_tenant_repo.add(created.id, *tenant_id).await?;
        }
        txn.commit().await?;

        tracing::info!(
            "User {} drafted lease {} on unit {}",
            actor.id,
            created.id,
            unit.id
        );

        Ok(LeaseDto::new(created, property.id, tenant_ids))
    }

    /// Changes the terms of a draft lease
    pub async fn update(
        &self,
        actor: &Actor,
        lease_id: i32,
        changes: UpdateLeaseDto,
    ) -> Result<LeaseDto, Error> {
        let (lease, unit, property) = lookup::lease(self.db, lease_id).await?;
        actor.ensure_manages(&property)?;
        ensure_status(&lease, LeaseStatus::Draft, "updated")?;

        let terms = LeaseTerms {
            start_date: changes.start_date.unwrap_or(lease.start_date),
            end_date: changes.end_date.unwrap_or(lease.end_date),
            rent_cents: changes.rent_cents.unwrap_or(lease.rent_cents),
            deposit_cents: changes.deposit_cents.unwrap_or(lease.deposit_cents),
            rent_due_day: changes.rent_due_day.unwrap_or(lease.rent_due_day),
        };
        validate_terms(&terms)?;
        ensure_no_overlap(self.db, unit.id, &terms, Some(lease.id)).await?;

        let updated = LeaseRepository::new(self.db)
            .update_terms(lease, terms)
            .await?;

        self.to_dto(updated, property.id).await
    }

    /// Activates a draft: occupies the unit, generates the rent schedule and
    /// notifies the tenants
    pub async fn activate(&self, actor: &Actor, lease_id: i32) -> Result<LeaseDto, Error> {
        let (lease, unit, property) = lookup::lease(self.db, lease_id).await?;
        actor.ensure_manages(&property)?;
        ensure_status(&lease, LeaseStatus::Draft, "activated")?;

        let due_dates = rent_schedule(
            lease.start_date,
            lease.end_date,
            lease.rent_due_day as u32,
        )?;

        let txn = self.db.begin().await?;
        let activated = LeaseRepository::new(&txn)
            .set_status(lease, LeaseStatus::Active)
            .await?;
        UnitRepository::new(&txn)
            .set_status(unit.id, UnitStatus::Occupied)
            .await?;
        let scheduled = RentPaymentRepository::new(&txn)
            .create_schedule(activated.id, activated.rent_cents, &due_dates)
            .await?;
        let tenant_ids = LeaseTenantRepository::new(&txn)
            .tenant_ids(activated.id)
            .await?;
        notify(
            &txn,
            &tenant_ids,
            Some(actor.id),
            NotificationKind::LeaseActivated,
            "Lease activated",
            format!(
                "Your lease for unit {} at {} is now active",
                unit.unit_number, property.name
            ),
            Some(format!("/leases/{}", activated.id)),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "Activated lease {} with {} scheduled payment(s)",
            activated.id,
            scheduled
        );

        Ok(LeaseDto::new(activated, property.id, tenant_ids))
    }

    /// Terminates an active lease, vacating the unit and waiving rent due
    /// after the effective date
    pub async fn terminate(
        &self,
        actor: &Actor,
        lease_id: i32,
        effective_date: Option<NaiveDate>,
    ) -> Result<LeaseDto, Error> {
        let (lease, unit, property) = lookup::lease(self.db, lease_id).await?;
        actor.ensure_manages(&property)?;
        ensure_status(&lease, LeaseStatus::Active, "terminated")?;

        let effective_date = effective_date.unwrap_or_else(|| Utc::now().date_naive());

        let txn = self.db.begin().await?;
        let terminated = LeaseRepository::new(&txn)
            .set_status(lease, LeaseStatus::Terminated)
            .await?;
        UnitRepository::new(&txn)
            .set_status(unit.id, UnitStatus::Vacant)
            .await?;
        let waived = RentPaymentRepository::new(&txn)
            .waive_pending_after(terminated.id, effective_date)
            .await?;
        txn.commit().await?;

        tracing::info!(
            "Terminated lease {} effective {}, waived {} payment(s)",
            terminated.id,
            effective_date,
            waived
        );

        self.to_dto(terminated, property.id).await
    }

    pub async fn add_tenant(
        &self,
        actor: &Actor,
        lease_id: i32,
        tenant_id: i32,
    ) -> Result<LeaseDto, Error> {
        let (lease, _, property) = lookup::lease(self.db, lease_id).await?;
        actor.ensure_manages(&property)?;
        if !matches!(lease.status, LeaseStatus::Draft | LeaseStatus::Active) {
            return Err(RequestError::invalid_state(format!(
                "Cannot add tenants to a {:?} lease",
                lease.status
            ))
            .into());
        }

        self.validate_tenants(&[tenant_id]).await?;

        let lease_tenant_repo = LeaseTenantRepository::new(self.db);
        if lease_tenant_repo.is_party(lease.id, tenant_id).await? {
            return Err(RequestError::conflict(format!(
                "User {} is already a tenant on lease {}",
                tenant_id, lease.id
            ))
            .into());
        }
        lease_tenant_repo.add(lease.id, tenant_id).await?;

        self.to_dto(lease, property.id).await
    }

    /// Removes a tenant; the last remaining tenant cannot be removed
    pub async fn remove_tenant(
        &self,
        actor: &Actor,
        lease_id: i32,
        tenant_id: i32,
    ) -> Result<LeaseDto, Error> {
        let (lease, _, property) = lookup::lease(self.db, lease_id).await?;
        actor.ensure_manages(&property)?;

        let lease_tenant_repo = LeaseTenantRepository::new(self.db);
        let tenant_ids = lease_tenant_repo.tenant_ids(lease.id).await?;
        if !tenant_ids.contains(&tenant_id) {
            return Err(RequestError::NotFound("Lease tenant").into());
        }
        if tenant_ids.len() == 1 {
            return Err(
                RequestError::invalid_state("A lease must keep at least one tenant").into(),
            );
        }

        lease_tenant_repo.remove(lease.id, tenant_id).await?;

        self.to_dto(lease, property.id).await
    }

    /// Marks active leases that ended before `today` as expired and vacates their units
    pub async fn expire_ended(&self, today: NaiveDate) -> Result<u64, Error> {
        let ended = LeaseRepository::new(self.db).find_ended(today).await?;
        let mut expired = 0;

        for lease in ended {
            let unit_id = lease.unit_id;
            let txn = self.db.begin().await?;
            LeaseRepository::new(&txn)
                .set_status(lease, LeaseStatus::Expired)
                .await?;
            UnitRepository::new(&txn)
                .set_status(unit_id, UnitStatus::Vacant)
                .await?;
            txn.commit().await?;
            expired += 1;
        }

        Ok(expired)
    }

    async fn to_dto(&self, lease: entity::lease::Model, property_id: i32) -> Result<LeaseDto, Error> {
        let tenant_ids = LeaseTenantRepository::new(self.db)
            .tenant_ids(lease.id)
            .await?;

        Ok(LeaseDto::new(lease, property_id, tenant_ids))
    }

    /// Deduplicates `tenant_ids`, requiring at least one and every id to be a tenant user
    async fn validate_tenants(&self, tenant_ids: &[i32]) -> Result<Vec<i32>, Error> {
        let mut ids = tenant_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(RequestError::validation("A lease needs at least one tenant").into());
        }

        let users = UserRepository::new(self.db).get_many(&ids).await?;
        let tenants = users
            .iter()
            .filter(|user| user.role == Role::Tenant)
            .count();
        if tenants != ids.len() {
            return Err(RequestError::validation("Every tenant must be a tenant user").into());
        }

        Ok(ids)
    }
}

async fn ensure_no_overlap<C: ConnectionTrait>(
    db: &C,
    unit_id: i32,
    terms: &LeaseTerms,
    exclude_lease_id: Option<i32>,
) -> Result<(), Error> {
    let overlapping = LeaseRepository::new(db)
        .find_overlapping(unit_id, terms.start_date, terms.end_date, exclude_lease_id)
        .await?;

    if let Some(existing) = overlapping.first() {
        return Err(RequestError::conflict(format!(
            "Lease {} on unit {} overlaps {} to {}",
            existing.id, unit_id, terms.start_date, terms.end_date
        ))
        .into());
    }

    Ok(())
}

fn ensure_status(
    lease: &entity::lease::Model,
    expected: LeaseStatus,
    action: &str,
) -> Result<(), Error> {
    if lease.status != expected {
        return Err(RequestError::invalid_state(format!(
            "Only {:?} leases can be {}, lease {} is {:?}",
            expected, action, lease.id, lease.status
        ))
        .into());
    }

    Ok(())
}

fn validate_terms(terms: &LeaseTerms) -> Result<(), Error> {
    if terms.end_date <= terms.start_date {
        return Err(RequestError::validation("end_date must be after start_date").into());
    }
    validate::positive("rent_cents", terms.rent_cents)?;
    validate::non_negative("deposit_cents", terms.deposit_cents)?;
    if !(1..=28).contains(&terms.rent_due_day) {
        return Err(RequestError::validation("rent_due_day must be between 1 and 28").into());
    }

    Ok(())
}
