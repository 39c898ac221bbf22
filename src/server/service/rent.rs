//! Rent schedule rows: listing, recording payments, waiving and overdue marking.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use entity::{notification::NotificationKind, rent_payment::RentStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::lease::{RecordPaymentDto, RentPaymentDto, RentPaymentListQuery},
    server::{
        data::{
            lease_tenant::LeaseTenantRepository,
            rent_payment::{PaymentRecord, RentPaymentFilter, RentPaymentRepository},
            Page,
        },
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, notification::notify, validate},
    },
};

pub struct RentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Full schedule of a lease, visible to its managers and tenants
    pub async fn list_for_lease(
        &self,
        actor: &Actor,
        lease_id: i32,
    ) -> Result<Vec<RentPaymentDto>, Error> {
        let (lease, _, property) = lookup::lease(self.db, lease_id).await?;

        if !actor.manages(&property) && !actor.is_lease_party(self.db, lease.id).await? {
            return Err(AuthError::forbidden(format!(
                "User {} cannot view payments of lease {}",
                actor.id, lease.id
            ))
            .into());
        }

        let payments = RentPaymentRepository::new(self.db)
            .list_by_lease(lease.id)
            .await?;

        Ok(payments.into_iter().map(RentPaymentDto::from).collect())
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: RentPaymentListQuery,
    ) -> Result<Page<RentPaymentDto>, Error> {
        let page = query.page_query();
        let filter = RentPaymentFilter {
            leases: actor.visible_leases(self.db).await?,
            lease_id: query.lease_id,
            status: query.status,
        };

        let payments = RentPaymentRepository::new(self.db)
            .list(&filter, page.page(), page.limit())
            .await?;

        Ok(payments.map(RentPaymentDto::from))
    }

    /// Adds `amount_cents` to what has been paid; the row becomes paid once the
    /// balance reaches zero
    pub async fn record(
        &self,
        actor: &Actor,
        payment_id: i32,
        payment: RecordPaymentDto,
    ) -> Result<RentPaymentDto, Error> {
        let rent_payment_repo = RentPaymentRepository::new(self.db);
        let existing = rent_payment_repo
            .get(payment_id)
            .await?
            .ok_or(RequestError::NotFound("Rent payment"))?;
        let (lease, unit, property) = lookup::lease(self.db, existing.lease_id).await?;
        actor.ensure_manages(&property)?;

        if matches!(existing.status, RentStatus::Paid | RentStatus::Waived) {
            return Err(RequestError::invalid_state(format!(
                "Rent payment {} is already {:?}",
                existing.id, existing.status
            ))
            .into());
        }

        validate::positive("amount_cents", payment.amount_cents)?;
        let outstanding = existing.amount_due_cents - existing.amount_paid_cents;
        if payment.amount_cents > outstanding {
            return Err(RequestError::validation(format!(
                "amount_cents exceeds the outstanding balance of {}",
                outstanding
            ))
            .into());
        }

        let amount_paid_cents = existing.amount_paid_cents + payment.amount_cents;
        let status = if amount_paid_cents >= existing.amount_due_cents {
            RentStatus::Paid
        } else {
            RentStatus::Partial
        };

        let recorded = rent_payment_repo
            .record(
                existing,
                PaymentRecord {
                    amount_paid_cents,
                    status,
                    paid_at: payment.paid_at.unwrap_or_else(|| Utc::now().naive_utc()),
                    method: validate::optional_text(payment.method),
                    notes: validate::optional_text(payment.notes),
                },
            )
            .await?;

        let tenant_ids = LeaseTenantRepository::new(self.db)
            .tenant_ids(lease.id)
            .await?;
        notify(
            self.db,
            &tenant_ids,
            Some(actor.id),
            NotificationKind::RentRecorded,
            "Rent payment recorded",
            format!(
                "A payment of {} was recorded for unit {} (due {})",
                format_cents(payment.amount_cents),
                unit.unit_number,
                recorded.due_date
            ),
            Some(format!("/leases/{}", lease.id)),
        )
        .await?;

        Ok(RentPaymentDto::from(recorded))
    }

    pub async fn waive(&self, actor: &Actor, payment_id: i32) -> Result<RentPaymentDto, Error> {
        let rent_payment_repo = RentPaymentRepository::new(self.db);
        let existing = rent_payment_repo
            .get(payment_id)
            .await?
            .ok_or(RequestError::NotFound("Rent payment"))?;
        let (_, _, property) = lookup::lease(self.db, existing.lease_id).await?;
        actor.ensure_manages(&property)?;

        if matches!(existing.status, RentStatus::Paid | RentStatus::Waived) {
            return Err(RequestError::invalid_state(format!(
                "Rent payment {} is already {:?}",
                existing.id, existing.status
            ))
            .into());
        }

        let waived = rent_payment_repo
            .set_status(existing, RentStatus::Waived)
            .await?;

        Ok(RentPaymentDto::from(waived))
    }

    /// Flags unpaid rows due before `today` as overdue and tells each lease's tenants
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, Error> {
        let marked = RentPaymentRepository::new(self.db)
            .mark_overdue(today)
            .await?;
        if marked.is_empty() {
            return Ok(0);
        }

        let mut by_lease: BTreeMap<i32, Vec<NaiveDate>> = BTreeMap::new();
        for payment in &marked {
            by_lease
                .entry(payment.lease_id)
                .or_default()
                .push(payment.due_date);
        }

        let lease_tenant_repo = LeaseTenantRepository::new(self.db);
        for (lease_id, due_dates) in by_lease {
            let tenant_ids = lease_tenant_repo.tenant_ids(lease_id).await?;
            let dates = due_dates
                .iter()
                .map(NaiveDate::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            notify(
                self.db,
                &tenant_ids,
                None,
                NotificationKind::RentOverdue,
                "Rent overdue",
                format!("Rent due on {} is overdue", dates),
                Some(format!("/leases/{}", lease_id)),
            )
            .await?;
        }

        Ok(marked.len() as u64)
    }
}

fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
