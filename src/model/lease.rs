use chrono::{NaiveDate, NaiveDateTime};
use entity::{lease::LeaseStatus, rent_payment::RentStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaseDto {
    pub id: i32,
    pub unit_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    pub rent_due_day: i32,
    #[schema(value_type = String, example = "active")]
    pub status: LeaseStatus,
    pub tenant_ids: Vec<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl LeaseDto {
    pub fn new(lease: entity::lease::Model, property_id: i32, tenant_ids: Vec<i32>) -> Self {
        Self {
            id: lease.id,
            unit_id: lease.unit_id,
            property_id,
            start_date: lease.start_date,
            end_date: lease.end_date,
            rent_cents: lease.rent_cents,
            deposit_cents: lease.deposit_cents,
            rent_due_day: lease.rent_due_day,
            status: lease.status,
            tenant_ids,
            created_at: lease.created_at,
            updated_at: lease.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLeaseDto {
    pub unit_id: i32,
    pub tenant_ids: Vec<i32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_cents: i64,
    pub deposit_cents: i64,
    /// Day of month rent is due, 1..=28
    pub rent_due_day: i32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateLeaseDto {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rent_cents: Option<i64>,
    pub deposit_cents: Option<i64>,
    pub rent_due_day: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TerminateLeaseDto {
    /// Defaults to today
    pub effective_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AddTenantDto {
    pub tenant_id: i32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaseListQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<LeaseStatus>,
    pub property_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl LeaseListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RentPaymentDto {
    pub id: i32,
    pub lease_id: i32,
    pub due_date: NaiveDate,
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    #[schema(value_type = String, example = "pending")]
    pub status: RentStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub method: Option<String>,
    pub notes: Option<String>,
}

impl From<entity::rent_payment::Model> for RentPaymentDto {
    fn from(payment: entity::rent_payment::Model) -> Self {
        Self {
            id: payment.id,
            lease_id: payment.lease_id,
            due_date: payment.due_date,
            amount_due_cents: payment.amount_due_cents,
            amount_paid_cents: payment.amount_paid_cents,
            status: payment.status,
            paid_at: payment.paid_at,
            method: payment.method,
            notes: payment.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordPaymentDto {
    pub amount_cents: i64,
    pub method: Option<String>,
    /// Defaults to now
    pub paid_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RentPaymentListQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<RentStatus>,
    pub lease_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl RentPaymentListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}
