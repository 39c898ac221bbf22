//! Role-specific aggregates for the landing page.

use chrono::{NaiveDate, Utc};
use entity::{
    app_user::Role, lease::LeaseStatus, maintenance_request::{ApprovalStatus, MaintenanceStatus},
    unit::UnitStatus,
};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        dashboard::{DashboardDto, ManagerDashboardDto, TenantDashboardDto, VendorDashboardDto},
        lease::RentPaymentDto,
    },
    server::{
        data::{
            lease::LeaseRepository,
            lease_tenant::LeaseTenantRepository,
            maintenance::{MaintenanceRepository, Visibility, OPEN_STATUSES},
            property::PropertyRepository,
            rent_payment::RentPaymentRepository,
            unit::UnitRepository,
            Scope,
        },
        error::Error,
        service::access::Actor,
        util::{money, time::month_bounds},
    },
};

pub struct DashboardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DashboardService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, actor: &Actor) -> Result<DashboardDto, Error> {
        let today = Utc::now().date_naive();

        let dashboard = match actor.role {
            Role::Admin | Role::Landlord | Role::Pmc => {
                DashboardDto::Manager(self.manager(actor, today).await?)
            }
            Role::Tenant => DashboardDto::Tenant(self.tenant(actor).await?),
            Role::Vendor => DashboardDto::Vendor(self.vendor(actor).await?),
        };

        Ok(dashboard)
    }

    async fn manager(&self, actor: &Actor, today: NaiveDate) -> Result<ManagerDashboardDto, Error> {
        let properties = actor.managed_properties(self.db).await?;
        let leases = match &properties {
            Scope::All => Scope::All,
            Scope::Only(_) => Scope::Only(
                LeaseRepository::new(self.db)
                    .ids_for_properties(&properties)
                    .await?,
            ),
        };
        let visibility = Visibility::Properties(properties.clone());
        let (month_start, next_month_start) = month_bounds(today)?;

        let property_repo = PropertyRepository::new(self.db);
        let unit_repo = UnitRepository::new(self.db);
        let maintenance_repo = MaintenanceRepository::new(self.db);
        let rent_payment_repo = RentPaymentRepository::new(self.db);

        let (
            property_count,
            units,
            occupied_units,
            open_maintenance,
            pending_approvals,
            overdue_rows,
            paid_this_month,
        ) = futures::try_join!(
            property_repo.count(&properties),
            unit_repo.count(&properties, None),
            unit_repo.count(&properties, Some(UnitStatus::Occupied)),
            maintenance_repo.count(&visibility, &OPEN_STATUSES, None),
            maintenance_repo.count(
                &visibility,
                &[MaintenanceStatus::Assigned],
                Some(ApprovalStatus::PendingApproval)
            ),
            rent_payment_repo.overdue_outstanding(&leases),
            rent_payment_repo.paid_between(&leases, month_start, next_month_start),
        )?;

        Ok(ManagerDashboardDto {
            properties: property_count,
            units,
            occupied_units,
            occupancy_rate: occupancy_rate(occupied_units, units),
            open_maintenance,
            pending_approvals,
            overdue_rent_cents: money::total_cents(overdue_rows)?,
            collected_this_month_cents: money::total_cents(paid_this_month)?,
        })
    }

    async fn tenant(&self, actor: &Actor) -> Result<TenantDashboardDto, Error> {
        let lease_ids = LeaseTenantRepository::new(self.db)
            .lease_ids_for_tenant(actor.id)
            .await?;
        let unit_ids = LeaseRepository::new(self.db)
            .get_many_with_units(&lease_ids)
            .await?
            .into_iter()
            .map(|(_, unit)| unit.id)
            .collect();
        let leases = Scope::Only(lease_ids.clone());
        let visibility = Visibility::Tenant {
            user_id: actor.id,
            unit_ids,
        };

        let lease_repo = LeaseRepository::new(self.db);
        let rent_payment_repo = RentPaymentRepository::new(self.db);
        let maintenance_repo = MaintenanceRepository::new(self.db);

        let (active_leases, next_payment, open_requests) = futures::try_join!(
            lease_repo.count(&leases, Some(LeaseStatus::Active)),
            rent_payment_repo.next_due(&lease_ids),
            maintenance_repo.count(&visibility, &OPEN_STATUSES, None),
        )?;

        Ok(TenantDashboardDto {
            active_leases,
            next_payment: next_payment.map(RentPaymentDto::from),
            open_requests,
        })
    }

    async fn vendor(&self, actor: &Actor) -> Result<VendorDashboardDto, Error> {
        let open_assignments = MaintenanceRepository::new(self.db)
            .count(&Visibility::Vendor(actor.id), &OPEN_STATUSES, None)
            .await?;

        Ok(VendorDashboardDto { open_assignments })
    }
}

fn occupancy_rate(occupied: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    occupied as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::{
        maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority},
        rent_payment::RentStatus,
        unit::UnitStatus,
    };
    use tenantry_test_utils::prelude::*;

    use super::{occupancy_rate, DashboardService};
    use crate::{
        model::dashboard::DashboardDto,
        server::{
            error::{request::RequestError, Error},
            service::access::Actor,
        },
    };

    #[test]
    fn occupancy_of_empty_portfolio_is_zero() {
        assert_eq!(occupancy_rate(0, 0), 0.0);
        assert_eq!(occupancy_rate(1, 4), 0.25);
    }

    /// Expect manager counts to cover only the landlord's own portfolio
    #[tokio::test]
    async fn manager_dashboard() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let other_landlord = test.user().insert_landlord().await?;
        let tenant = test.user().insert_tenant().await?;
        let vendor = test.user().insert_vendor().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let other_property = test.property().insert_property(other_landlord.id).await?;
        let occupied = test
            .property()
            .insert_unit_with_status(property.id, UnitStatus::Occupied)
            .await?;
        test.property().insert_unit(property.id).await?;
        test.property().insert_unit(other_property.id).await?;
        let lease = test
            .lease()
            .insert_active_lease(occupied.id, &[tenant.id])
            .await?;
        test.lease()
            .insert_rent_payment(lease.id, Utc::now().date_naive(), 120_000, RentStatus::Overdue)
            .await?;
        let request = test
            .maintenance()
            .insert_request(property.id, None, tenant.id, Priority::High)
            .await?;
        test.maintenance()
            .assign_vendor(request, vendor.id, 900_000, ApprovalStatus::PendingApproval)
            .await?;
        let done = test
            .maintenance()
            .insert_request(property.id, None, tenant.id, Priority::Low)
            .await?;
        test.maintenance()
            .set_status(done, MaintenanceStatus::Completed)
            .await?;

        let dashboard = DashboardService::new(&test.db)
            .get(&Actor::from(&landlord))
            .await
            .unwrap();
        let DashboardDto::Manager(dashboard) = dashboard else {
            panic!("expected a manager dashboard");
        };

        assert_eq!(dashboard.properties, 1);
        assert_eq!(dashboard.units, 2);
        assert_eq!(dashboard.occupied_units, 1);
        assert_eq!(dashboard.occupancy_rate, 0.5);
        assert_eq!(dashboard.open_maintenance, 1);
        assert_eq!(dashboard.pending_approvals, 1);
        assert_eq!(dashboard.overdue_rent_cents, 120_000);
        assert_eq!(dashboard.collected_this_month_cents, 0);

        Ok(())
    }

    /// Expect an error instead of a wrapped overdue total
    #[tokio::test]
    async fn overflowing_overdue_total_is_rejected() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let lease = test.lease().insert_active_lease(unit.id, &[]).await?;
        for _ in 0..2 {
            test.lease()
                .insert_rent_payment(
                    lease.id,
                    Utc::now().date_naive(),
                    i64::MAX / 2 + 1,
                    RentStatus::Overdue,
                )
                .await?;
        }

        let result = DashboardService::new(&test.db)
            .get(&Actor::from(&landlord))
            .await;

        assert!(matches!(
            result,
            Err(Error::RequestError(RequestError::Validation(_)))
        ));

        Ok(())
    }

    /// Expect tenants to see their next unpaid row and vendors their open work
    #[tokio::test]
    async fn tenant_and_vendor_dashboards() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let tenant = test.user().insert_tenant().await?;
        let vendor = test.user().insert_vendor().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
        let due = test
            .lease()
            .insert_rent_payment(lease.id, Utc::now().date_naive(), 150_000, RentStatus::Pending)
            .await?;
        let request = test
            .maintenance()
            .insert_request(property.id, Some(unit.id), tenant.id, Priority::Medium)
            .await?;
        test.maintenance()
            .assign_vendor(request, vendor.id, 1_000, ApprovalStatus::Approved)
            .await?;
        let service = DashboardService::new(&test.db);

        let DashboardDto::Tenant(dashboard) = service.get(&Actor::from(&tenant)).await.unwrap()
        else {
            panic!("expected a tenant dashboard");
        };
        assert_eq!(dashboard.active_leases, 1);
        assert_eq!(dashboard.open_requests, 1);
        assert_eq!(dashboard.next_payment.map(|p| p.id), Some(due.id));

        let DashboardDto::Vendor(dashboard) = service.get(&Actor::from(&vendor)).await.unwrap()
        else {
            panic!("expected a vendor dashboard");
        };
        assert_eq!(dashboard.open_assignments, 1);

        Ok(())
    }
}
