//! Maintenance requests: filing, vendor assignment with cost approval,
//! status transitions and comments.

mod approval;
mod ticket;


pub use approval::{approval_for, pmc_approval_limit};
pub use ticket::ticket_number;

use chrono::{Duration, Utc};
use entity::{
    app_user::Role,
    lease::LeaseStatus,
    maintenance_request::{ApprovalStatus, MaintenanceStatus},
    notification::NotificationKind,
};
use sea_orm::DatabaseConnection;

use crate::{
    model::maintenance::{
        CommentDto, CreateMaintenanceDto, MaintenanceDetailDto, MaintenanceListQuery,
        MaintenanceRequestDto,
    },
    server::{
        data::{
            lease::LeaseRepository,
            lease_tenant::LeaseTenantRepository,
            maintenance::{
                MaintenanceFilter, MaintenanceRepository, NewMaintenanceRequest, Visibility,
            },
            user::UserRepository,
            is_unique_violation, Page,
        },
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, notification::notify, validate},
    },
};

/// Ticket numbers tried before a collision is reported as a conflict
const TICKET_ATTEMPTS: u32 = 5;

/// Who may move a request into a given status
enum Mover {
    Manager,
    Vendor,
    Requester,
}

pub struct MaintenanceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: MaintenanceListQuery,
    ) -> Result<Page<MaintenanceRequestDto>, Error> {
        let page = query.page_query();
        let visibility = self.visibility(actor).await?;
        let filter = MaintenanceFilter {
            status: query.status,
            priority: query.priority,
            property_id: query.property_id,
        };

        let requests = MaintenanceRepository::new(self.db)
            .list(&visibility, &filter, page.page(), page.limit())
            .await?;

        Ok(requests.map(MaintenanceRequestDto::from))
    }

    /// Request with its comments
    pub async fn get(&self, actor: &Actor, request_id: i32) -> Result<MaintenanceDetailDto, Error> {
        let request = self.get_visible(actor, request_id).await?;
        let comments = MaintenanceRepository::new(self.db)
            .comments(request.id)
            .await?;

        Ok(MaintenanceDetailDto {
            request: MaintenanceRequestDto::from(request),
            comments: comments.into_iter().map(CommentDto::from).collect(),
        })
    }

    /// Files a request; tenants need an active lease on the property, and on
    /// the unit when one is given
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateMaintenanceDto,
    ) -> Result<MaintenanceRequestDto, Error> {
        let property = lookup::property(self.db, request.property_id).await?;

        if let Some(unit_id) = request.unit_id {
            let unit = lookup::unit(self.db, unit_id).await?;
            if unit.property_id != property.id {
                return Err(RequestError::validation(format!(
                    "Unit {} does not belong to property {}",
                    unit.id, property.id
                ))
                .into());
            }
        }

        if !actor.manages(&property) {
            let allowed = actor.role == Role::Tenant
                && self
                    .tenant_unit_ids(actor, true)
                    .await?
                    .iter()
                    .any(|(unit_id, property_id)| {
                        *property_id == property.id
                            && request.unit_id.is_none_or(|requested| requested == *unit_id)
                    });
            if !allowed {
                return Err(AuthError::forbidden(format!(
                    "User {} cannot file maintenance requests for property {}",
                    actor.id, property.id
                ))
                .into());
            }
        }

        let title = validate::required_text("title", &request.title)?;
        let description = validate::required_text("description", &request.description)?;
        let created_at = Utc::now().naive_utc();

        let created = self
            .insert_with_ticket(NewMaintenanceRequest {
                ticket_number: ticket_number(property.id, actor.id, created_at, &title),
                property_id: property.id,
                unit_id: request.unit_id,
                requested_by: actor.id,
                title,
                description,
                priority: request.priority,
                created_at,
            })
            .await?;

        let managers: Vec<i32> = std::iter::once(property.landlord_id)
            .chain(property.pmc_id)
            .collect();
        notify(
            self.db,
            &managers,
            Some(actor.id),
            NotificationKind::MaintenanceCreated,
            format!("New maintenance request {}", created.ticket_number),
            format!("{} at {}", created.title, property.name),
            Some(format!("/maintenance/{}", created.id)),
        )
        .await?;

        tracing::info!(
            "User {} filed maintenance request {}",
            actor.id,
            created.ticket_number
        );

        Ok(MaintenanceRequestDto::from(created))
    }

    /// Inserts `request`, moving `created_at` forward a microsecond and deriving a
    /// new ticket number each time the current one is already taken
    async fn insert_with_ticket(
        &self,
        mut request: NewMaintenanceRequest,
    ) -> Result<entity::maintenance_request::Model, Error> {
        let maintenance_repo = MaintenanceRepository::new(self.db);
        let mut attempt = 1;

        loop {
            match maintenance_repo.create(request.clone()).await {
                Err(err) if is_unique_violation(&err) && attempt < TICKET_ATTEMPTS => {
                    tracing::warn!(
                        "Ticket number {} is taken, retrying (attempt {})",
                        request.ticket_number,
                        attempt
                    );
                    request.created_at += Duration::microseconds(1);
                    request.ticket_number = ticket_number(
                        request.property_id,
                        request.requested_by,
                        request.created_at,
                        &request.title,
                    );
                    attempt += 1;
                }
                result => return Ok(result?),
            }
        }
    }

    /// Assigns a vendor; PMC estimates above the priority limit wait for the owner
    pub async fn assign(
        &self,
        actor: &Actor,
        request_id: i32,
        vendor_id: i32,
        estimated_cost_cents: i64,
    ) -> Result<MaintenanceRequestDto, Error> {
        let request = self.get_request(request_id).await?;
        let property = lookup::property(self.db, request.property_id).await?;
        actor.ensure_manages(&property)?;

        if !matches!(
            request.status,
            MaintenanceStatus::Open | MaintenanceStatus::Assigned
        ) {
            return Err(RequestError::invalid_state(format!(
                "Cannot assign a vendor to a {:?} request",
                request.status
            ))
            .into());
        }

        let vendor = UserRepository::new(self.db).get(vendor_id).await?;
        if vendor.is_none_or(|vendor| vendor.role != Role::Vendor) {
            return Err(
                RequestError::validation("vendor_id must reference a vendor user").into(),
            );
        }
        validate::non_negative("estimated_cost_cents", estimated_cost_cents)?;

        let approval = approval_for(actor.role, request.priority, estimated_cost_cents);
        let assigned = MaintenanceRepository::new(self.db)
            .assign(request, vendor_id, estimated_cost_cents, approval)
            .await?;

        let link = Some(format!("/maintenance/{}", assigned.id));
        match approval {
            ApprovalStatus::PendingApproval => {
                notify(
                    self.db,
                    &[property.landlord_id],
                    Some(actor.id),
                    NotificationKind::MaintenanceApproval,
                    format!("Approval needed for {}", assigned.ticket_number),
                    format!(
                        "Estimated cost of {} cents exceeds the manager's approval limit",
                        estimated_cost_cents
                    ),
                    link,
                )
                .await?;
            }
            _ => {
                notify(
                    self.db,
                    &[vendor_id],
                    Some(actor.id),
                    NotificationKind::MaintenanceAssigned,
                    format!("Assigned to {}", assigned.ticket_number),
                    assigned.title.clone(),
                    link,
                )
                .await?;
            }
        }

        Ok(MaintenanceRequestDto::from(assigned))
    }

    /// Owner decision on an assignment awaiting approval
    pub async fn decide_approval(
        &self,
        actor: &Actor,
        request_id: i32,
        approve: bool,
    ) -> Result<MaintenanceRequestDto, Error> {
        let request = self.get_request(request_id).await?;
        let property = lookup::property(self.db, request.property_id).await?;
        actor.ensure_owns(&property)?;

        if request.approval_status != Some(ApprovalStatus::PendingApproval) {
            return Err(RequestError::invalid_state(format!(
                "Maintenance request {} is not awaiting approval",
                request.ticket_number
            ))
            .into());
        }

        let maintenance_repo = MaintenanceRepository::new(self.db);
        let decided = if approve {
            let approved = maintenance_repo.approve(request).await?;
            if let Some(vendor_id) = approved.vendor_id {
                notify(
                    self.db,
                    &[vendor_id],
                    Some(actor.id),
                    NotificationKind::MaintenanceAssigned,
                    format!("Assigned to {}", approved.ticket_number),
                    approved.title.clone(),
                    Some(format!("/maintenance/{}", approved.id)),
                )
                .await?;
            }
            approved
        } else {
            maintenance_repo.reject(request).await?
        };

        Ok(MaintenanceRequestDto::from(decided))
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        request_id: i32,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceRequestDto, Error> {
        let request = self.get_visible(actor, request_id).await?;
        let property = lookup::property(self.db, request.property_id).await?;

        let movers = allowed_movers(&request, status).ok_or_else(|| {
            RequestError::invalid_state(format!(
                "Cannot move request {} from {:?} to {:?}",
                request.ticket_number, request.status, status
            ))
        })?;
        let allowed = movers.iter().any(|mover| match mover {
            Mover::Manager => actor.manages(&property),
            Mover::Vendor => request.vendor_id == Some(actor.id),
            Mover::Requester => request.requested_by == actor.id,
        });
        if !allowed {
            return Err(AuthError::forbidden(format!(
                "User {} cannot move request {} to {:?}",
                actor.id, request.ticket_number, status
            ))
            .into());
        }

        if status == MaintenanceStatus::InProgress
            && (request.vendor_id.is_none()
                || request.approval_status != Some(ApprovalStatus::Approved))
        {
            return Err(RequestError::invalid_state(
                "Work can only start once an approved vendor is assigned",
            )
            .into());
        }

        let updated = MaintenanceRepository::new(self.db)
            .set_status(request, status)
            .await?;

        notify(
            self.db,
            &[updated.requested_by],
            Some(actor.id),
            NotificationKind::MaintenanceStatus,
            format!("{} updated", updated.ticket_number),
            format!("{} is now {:?}", updated.title, status),
            Some(format!("/maintenance/{}", updated.id)),
        )
        .await?;

        Ok(MaintenanceRequestDto::from(updated))
    }

    pub async fn add_comment(
        &self,
        actor: &Actor,
        request_id: i32,
        body: &str,
    ) -> Result<CommentDto, Error> {
        let request = self.get_visible(actor, request_id).await?;
        let body = validate::required_text("body", body)?;

        let comment = MaintenanceRepository::new(self.db)
            .add_comment(request.id, actor.id, body)
            .await?;

        Ok(CommentDto::from(comment))
    }

    async fn get_request(&self, request_id: i32) -> Result<entity::maintenance_request::Model, Error> {
        MaintenanceRepository::new(self.db)
            .get(request_id)
            .await?
            .ok_or_else(|| RequestError::NotFound("Maintenance request").into())
    }

    /// Loads a request the actor participates in, 404 before 403
    async fn get_visible(
        &self,
        actor: &Actor,
        request_id: i32,
    ) -> Result<entity::maintenance_request::Model, Error> {
        let request = self.get_request(request_id).await?;

        let visible = match actor.role {
            Role::Vendor => request.vendor_id == Some(actor.id),
            Role::Tenant => {
                request.requested_by == actor.id
                    || match request.unit_id {
                        Some(unit_id) => self
                            .tenant_unit_ids(actor, false)
                            .await?
                            .iter()
                            .any(|(leased_unit, _)| *leased_unit == unit_id),
                        None => false,
                    }
            }
            _ => {
                let property = lookup::property(self.db, request.property_id).await?;
                actor.manages(&property)
            }
        };

        if visible {
            return Ok(request);
        }

        Err(AuthError::forbidden(format!(
            "User {} cannot access maintenance request {}",
            actor.id, request.ticket_number
        ))
        .into())
    }

    async fn visibility(&self, actor: &Actor) -> Result<Visibility, Error> {
        let visibility = match actor.role {
            Role::Tenant => Visibility::Tenant {
                user_id: actor.id,
                unit_ids: self
                    .tenant_unit_ids(actor, false)
                    .await?
                    .into_iter()
                    .map(|(unit_id, _)| unit_id)
                    .collect(),
            },
            Role::Vendor => Visibility::Vendor(actor.id),
            _ => Visibility::Properties(actor.managed_properties(self.db).await?),
        };

        Ok(visibility)
    }

    /// `(unit_id, property_id)` of the tenant's leases
    async fn tenant_unit_ids(
        &self,
        actor: &Actor,
        active_only: bool,
    ) -> Result<Vec<(i32, i32)>, Error> {
        let lease_ids = LeaseTenantRepository::new(self.db)
            .lease_ids_for_tenant(actor.id)
            .await?;
        let units = LeaseRepository::new(self.db)
            .get_many_with_units(&lease_ids)
            .await?
            .into_iter()
            .filter(|(lease, _)| !active_only || lease.status == LeaseStatus::Active)
            .map(|(_, unit)| (unit.id, unit.property_id))
            .collect();

        Ok(units)
    }
}

/// Movers allowed to take `request` to `status`, or `None` when the
/// transition does not exist
fn allowed_movers(
    request: &entity::maintenance_request::Model,
    status: MaintenanceStatus,
) -> Option<&'static [Mover]> {
    use MaintenanceStatus::*;

    match (request.status, status) {
        (Open | Assigned, InProgress) => Some(&[Mover::Manager, Mover::Vendor]),
        (InProgress, Completed) => Some(&[Mover::Manager, Mover::Vendor]),
        (Open, Cancelled) => Some(&[Mover::Manager, Mover::Requester]),
        (Assigned | InProgress, Cancelled) => Some(&[Mover::Manager]),
        _ => None,
    }
}
