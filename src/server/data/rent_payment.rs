use chrono::{NaiveDate, NaiveDateTime, Utc};
use entity::rent_payment::RentStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::data::{fetch_page, Page, Scope};

/// Filters for listing rent payments
#[derive(Clone, Debug)]
pub struct RentPaymentFilter {
    pub leases: Scope,
    pub lease_id: Option<i32>,
    pub status: Option<RentStatus>,
}

/// A payment applied to a rent row
#[derive(Clone, Debug)]
pub struct PaymentRecord {
    pub amount_paid_cents: i64,
    pub status: RentStatus,
    pub paid_at: NaiveDateTime,
    pub method: Option<String>,
    pub notes: Option<String>,
}

pub struct RentPaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RentPaymentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts one pending row per due date
    pub async fn create_schedule(
        &self,
        lease_id: i32,
        amount_due_cents: i64,
        due_dates: &[NaiveDate],
    ) -> Result<u64, DbErr> {
        if due_dates.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().naive_utc();
        let rows = due_dates
            .iter()
            .map(|due_date| entity::rent_payment::ActiveModel {
                lease_id: ActiveValue::Set(lease_id),
                due_date: ActiveValue::Set(*due_date),
                amount_due_cents: ActiveValue::Set(amount_due_cents),
                amount_paid_cents: ActiveValue::Set(0),
                status: ActiveValue::Set(RentStatus::Pending),
                paid_at: ActiveValue::Set(None),
                method: ActiveValue::Set(None),
                notes: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            });

        entity::prelude::RentPayment::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(due_dates.len() as u64)
    }

    pub async fn get(&self, payment_id: i32) -> Result<Option<entity::rent_payment::Model>, DbErr> {
        entity::prelude::RentPayment::find_by_id(payment_id)
            .one(self.db)
            .await
    }

    pub async fn list_by_lease(
        &self,
        lease_id: i32,
    ) -> Result<Vec<entity::rent_payment::Model>, DbErr> {
        entity::prelude::RentPayment::find()
            .filter(entity::rent_payment::Column::LeaseId.eq(lease_id))
            .order_by_asc(entity::rent_payment::Column::DueDate)
            .all(self.db)
            .await
    }

    pub async fn list(
        &self,
        filter: &RentPaymentFilter,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::rent_payment::Model>, DbErr> {
        let mut select = filter
            .leases
            .apply(
                entity::prelude::RentPayment::find(),
                entity::rent_payment::Column::LeaseId,
            )
            .order_by_asc(entity::rent_payment::Column::DueDate)
            .order_by_asc(entity::rent_payment::Column::Id);
        if let Some(lease_id) = filter.lease_id {
            select = select.filter(entity::rent_payment::Column::LeaseId.eq(lease_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(entity::rent_payment::Column::Status.eq(status));
        }

        fetch_page(self.db, select, page, limit).await
    }

    pub async fn record(
        &self,
        payment: entity::rent_payment::Model,
        record: PaymentRecord,
    ) -> Result<entity::rent_payment::Model, DbErr> {
        let mut payment_am = payment.into_active_model();
        payment_am.amount_paid_cents = ActiveValue::Set(record.amount_paid_cents);
        payment_am.status = ActiveValue::Set(record.status);
        payment_am.paid_at = ActiveValue::Set(Some(record.paid_at));
        payment_am.method = ActiveValue::Set(record.method);
        payment_am.notes = ActiveValue::Set(record.notes);
        payment_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        payment_am.update(self.db).await
    }

    pub async fn set_status(
        &self,
        payment: entity::rent_payment::Model,
        status: RentStatus,
    ) -> Result<entity::rent_payment::Model, DbErr> {
        let mut payment_am = payment.into_active_model();
        payment_am.status = ActiveValue::Set(status);
        payment_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        payment_am.update(self.db).await
    }

    /// Waives pending rows of the lease due after `effective_date`
    pub async fn waive_pending_after(
        &self,
        lease_id: i32,
        effective_date: NaiveDate,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::RentPayment::update_many()
            .set(entity::rent_payment::ActiveModel {
                status: ActiveValue::Set(RentStatus::Waived),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .filter(entity::rent_payment::Column::LeaseId.eq(lease_id))
            .filter(entity::rent_payment::Column::Status.eq(RentStatus::Pending))
            .filter(entity::rent_payment::Column::DueDate.gt(effective_date))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Flags pending or partially paid rows due before `today` as overdue and
    /// returns the rows it changed.
    ///
    /// The status and due date are checked by the UPDATE itself, so a payment
    /// recorded while the sweep runs keeps its `paid` status.
    pub async fn mark_overdue(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<entity::rent_payment::Model>, DbErr> {
        entity::prelude::RentPayment::update_many()
            .set(entity::rent_payment::ActiveModel {
                status: ActiveValue::Set(RentStatus::Overdue),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .filter(
                entity::rent_payment::Column::Status
                    .is_in([RentStatus::Pending, RentStatus::Partial]),
            )
            .filter(entity::rent_payment::Column::DueDate.lt(today))
            .exec_with_returning(self.db)
            .await
    }

    /// Outstanding balance of each overdue row of the scoped leases
    pub async fn overdue_outstanding(&self, leases: &Scope) -> Result<Vec<i64>, DbErr> {
        let rows: Vec<(i64, i64)> = leases
            .apply(
                entity::prelude::RentPayment::find(),
                entity::rent_payment::Column::LeaseId,
            )
            .select_only()
            .column(entity::rent_payment::Column::AmountDueCents)
            .column(entity::rent_payment::Column::AmountPaidCents)
            .filter(entity::rent_payment::Column::Status.eq(RentStatus::Overdue))
            .into_tuple()
            .all(self.db)
            .await?;

        // amount_paid never exceeds amount_due and neither is negative
        Ok(rows.into_iter().map(|(due, paid)| due - paid).collect())
    }

    /// Amount paid on each row of the scoped leases whose latest payment landed in
    /// `[from, to)`.
    ///
    /// Rows keep a running total and the time of the last payment only, so a row
    /// paid across two months counts in full toward the month it was last paid in.
    pub async fn paid_between(
        &self,
        leases: &Scope,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<i64>, DbErr> {
        leases
            .apply(
                entity::prelude::RentPayment::find(),
                entity::rent_payment::Column::LeaseId,
            )
            .select_only()
            .column(entity::rent_payment::Column::AmountPaidCents)
            .filter(entity::rent_payment::Column::PaidAt.gte(from))
            .filter(entity::rent_payment::Column::PaidAt.lt(to))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Earliest unpaid row among the given leases
    pub async fn next_due(
        &self,
        lease_ids: &[i32],
    ) -> Result<Option<entity::rent_payment::Model>, DbErr> {
        entity::prelude::RentPayment::find()
            .filter(entity::rent_payment::Column::LeaseId.is_in(lease_ids.iter().copied()))
            .filter(entity::rent_payment::Column::Status.is_in([
                RentStatus::Pending,
                RentStatus::Partial,
                RentStatus::Overdue,
            ]))
            .order_by_asc(entity::rent_payment::Column::DueDate)
            .one(self.db)
            .await
    }
}
