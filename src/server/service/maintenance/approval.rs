use entity::{
    app_user::Role,
    maintenance_request::{ApprovalStatus, Priority},
};

/// Highest estimate, in cents, a PMC may approve on its own
pub fn pmc_approval_limit(priority: Priority) -> i64 {
    match priority {
        Priority::Low => 50_000,
        Priority::Medium => 100_000,
        Priority::High => 250_000,
        Priority::Emergency => 500_000,
    }
}

/// Approval state of a vendor assignment made by `role`
pub fn approval_for(role: Role, priority: Priority, estimated_cost_cents: i64) -> ApprovalStatus {
    match role {
        Role::Pmc if estimated_cost_cents > pmc_approval_limit(priority) => {
            ApprovalStatus::PendingApproval
        }
        _ => ApprovalStatus::Approved,
    }
}
