use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::lease::RentPaymentDto;

/// Role-specific dashboard, tagged by `kind`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardDto {
    Manager(ManagerDashboardDto),
    Tenant(TenantDashboardDto),
    Vendor(VendorDashboardDto),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ManagerDashboardDto {
    pub properties: u64,
    pub units: u64,
    pub occupied_units: u64,
    /// Occupied units over all units, 0.0 when there are none
    pub occupancy_rate: f64,
    pub open_maintenance: u64,
    pub pending_approvals: u64,
    pub overdue_rent_cents: i64,
    pub collected_this_month_cents: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantDashboardDto {
    pub active_leases: u64,
    pub next_payment: Option<RentPaymentDto>,
    pub open_requests: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorDashboardDto {
    pub open_assignments: u64,
}
