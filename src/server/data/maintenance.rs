use chrono::{NaiveDateTime, Utc};
use entity::maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::server::data::{fetch_page, Page, Scope};

/// Statuses counted as work still to be done
pub const OPEN_STATUSES: [MaintenanceStatus; 3] = [
    MaintenanceStatus::Open,
    MaintenanceStatus::Assigned,
    MaintenanceStatus::InProgress,
];

/// Which maintenance requests a caller can see
#[derive(Clone, Debug)]
pub enum Visibility {
    /// Requests on properties in scope
    Properties(Scope),
    /// Requests the tenant filed or that sit on units they lease
    Tenant { user_id: i32, unit_ids: Vec<i32> },
    /// Requests assigned to the vendor
    Vendor(i32),
}

impl Visibility {
    fn apply(
        &self,
        select: Select<entity::maintenance_request::Entity>,
    ) -> Select<entity::maintenance_request::Entity> {
        match self {
            Self::Properties(scope) => {
                scope.apply(select, entity::maintenance_request::Column::PropertyId)
            }
            Self::Tenant { user_id, unit_ids } => select.filter(
                Condition::any()
                    .add(entity::maintenance_request::Column::RequestedBy.eq(*user_id))
                    .add(
                        entity::maintenance_request::Column::UnitId
                            .is_in(unit_ids.iter().copied()),
                    ),
            ),
            Self::Vendor(vendor_id) => {
                select.filter(entity::maintenance_request::Column::VendorId.eq(*vendor_id))
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaintenanceFilter {
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<Priority>,
    pub property_id: Option<i32>,
}

/// Fields of a new request
#[derive(Clone, Debug)]
pub struct NewMaintenanceRequest {
    pub ticket_number: String,
    pub property_id: i32,
    pub unit_id: Option<i32>,
    pub requested_by: i32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub created_at: NaiveDateTime,
}

pub struct MaintenanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MaintenanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        request: NewMaintenanceRequest,
    ) -> Result<entity::maintenance_request::Model, DbErr> {
        entity::maintenance_request::ActiveModel {
            ticket_number: ActiveValue::Set(request.ticket_number),
            property_id: ActiveValue::Set(request.property_id),
            unit_id: ActiveValue::Set(request.unit_id),
            requested_by: ActiveValue::Set(request.requested_by),
            vendor_id: ActiveValue::Set(None),
            title: ActiveValue::Set(request.title),
            description: ActiveValue::Set(request.description),
            priority: ActiveValue::Set(request.priority),
            status: ActiveValue::Set(MaintenanceStatus::Open),
            approval_status: ActiveValue::Set(None),
            estimated_cost_cents: ActiveValue::Set(None),
            created_at: ActiveValue::Set(request.created_at),
            updated_at: ActiveValue::Set(request.created_at),
            completed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        request_id: i32,
    ) -> Result<Option<entity::maintenance_request::Model>, DbErr> {
        entity::prelude::MaintenanceRequest::find_by_id(request_id)
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        visibility: &Visibility,
        filter: &MaintenanceFilter,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::maintenance_request::Model>, DbErr> {
        let mut select = visibility
            .apply(entity::prelude::MaintenanceRequest::find())
            .order_by_desc(entity::maintenance_request::Column::CreatedAt)
            .order_by_desc(entity::maintenance_request::Column::Id);
        if let Some(status) = filter.status {
            select = select.filter(entity::maintenance_request::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            select = select.filter(entity::maintenance_request::Column::Priority.eq(priority));
        }
        if let Some(property_id) = filter.property_id {
            select =
                select.filter(entity::maintenance_request::Column::PropertyId.eq(property_id));
        }

        fetch_page(self.db, select, page, limit).await
    }

    /// Counts visible requests in any of `statuses`, optionally with the given approval status
    pub async fn count(
        &self,
        visibility: &Visibility,
        statuses: &[MaintenanceStatus],
        approval: Option<ApprovalStatus>,
    ) -> Result<u64, DbErr> {
        let mut select = visibility
            .apply(entity::prelude::MaintenanceRequest::find())
            .filter(entity::maintenance_request::Column::Status.is_in(statuses.iter().copied()));
        if let Some(approval) = approval {
            select =
                select.filter(entity::maintenance_request::Column::ApprovalStatus.eq(approval));
        }

        select.count(self.db).await
    }

    /// Properties on which the vendor holds an assignment
    pub async fn property_ids_for_vendor(&self, vendor_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::MaintenanceRequest::find()
            .select_only()
            .column(entity::maintenance_request::Column::PropertyId)
            .distinct()
            .filter(entity::maintenance_request::Column::VendorId.eq(vendor_id))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn assign(
        &self,
        request: entity::maintenance_request::Model,
        vendor_id: i32,
        estimated_cost_cents: i64,
        approval: ApprovalStatus,
    ) -> Result<entity::maintenance_request::Model, DbErr> {
        let mut request_am = request.into_active_model();
        request_am.vendor_id = ActiveValue::Set(Some(vendor_id));
        request_am.estimated_cost_cents = ActiveValue::Set(Some(estimated_cost_cents));
        request_am.approval_status = ActiveValue::Set(Some(approval));
        request_am.status = ActiveValue::Set(MaintenanceStatus::Assigned);
        request_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        request_am.update(self.db).await
    }

    pub async fn approve(
        &self,
        request: entity::maintenance_request::Model,
    ) -> Result<entity::maintenance_request::Model, DbErr> {
        let mut request_am = request.into_active_model();
        request_am.approval_status = ActiveValue::Set(Some(ApprovalStatus::Approved));
        request_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        request_am.update(self.db).await
    }

    /// Rejects the assignment, clearing the vendor and reopening the request
    pub async fn reject(
        &self,
        request: entity::maintenance_request::Model,
    ) -> Result<entity::maintenance_request::Model, DbErr> {
        let mut request_am = request.into_active_model();
        request_am.approval_status = ActiveValue::Set(Some(ApprovalStatus::Rejected));
        request_am.vendor_id = ActiveValue::Set(None);
        request_am.status = ActiveValue::Set(MaintenanceStatus::Open);
        request_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        request_am.update(self.db).await
    }

    pub async fn set_status(
        &self,
        request: entity::maintenance_request::Model,
        status: MaintenanceStatus,
    ) -> Result<entity::maintenance_request::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let mut request_am = request.into_active_model();
        request_am.status = ActiveValue::Set(status);
        if status == MaintenanceStatus::Completed {
            request_am.completed_at = ActiveValue::Set(Some(now));
        }
        request_am.updated_at = ActiveValue::Set(now);

        request_am.update(self.db).await
    }

    pub async fn add_comment(
        &self,
        request_id: i32,
        author_id: i32,
        body: String,
    ) -> Result<entity::maintenance_comment::Model, DbErr> {
        entity::maintenance_comment::ActiveModel {
            request_id: ActiveValue::Set(request_id),
            author_id: ActiveValue::Set(author_id),
            body: ActiveValue::Set(body),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn comments(
        &self,
        request_id: i32,
    ) -> Result<Vec<entity::maintenance_comment::Model>, DbErr> {
        entity::prelude::MaintenanceComment::find()
            .filter(entity::maintenance_comment::Column::RequestId.eq(request_id))
            .order_by_asc(entity::maintenance_comment::Column::CreatedAt)
            .order_by_asc(entity::maintenance_comment::Column::Id)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use entity::maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority};
    use tenantry_test_utils::prelude::*;

    use super::{MaintenanceFilter, MaintenanceRepository, Visibility, OPEN_STATUSES};
    use crate::server::data::Scope;

    /// Expect tenant visibility to cover own requests and requests on leased units
    #[tokio::test]
    async fn tenant_visibility() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let tenant = test.user().insert_tenant().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let other_unit = test.property().insert_unit(property.id).await?;

        test.maintenance()
            .insert_request(property.id, None, tenant.id, Priority::Low)
            .await?;
        test.maintenance()
            .insert_request(property.id, Some(unit.id), landlord.id, Priority::High)
            .await?;
        test.maintenance()
            .insert_request(property.id, Some(other_unit.id), landlord.id, Priority::High)
            .await?;

        let repo = MaintenanceRepository::new(&test.db);
        let visibility = Visibility::Tenant {
            user_id: tenant.id,
            unit_ids: vec![unit.id],
        };
        let page = repo
            .list(&visibility, &MaintenanceFilter::default(), 1, 20)
            .await?;
        assert_eq!(page.total, 2);

        let high_only = MaintenanceFilter {
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(repo.list(&visibility, &high_only, 1, 20).await?.total, 1);

        let managers = Visibility::Properties(Scope::Only(vec![property.id]));
        assert_eq!(repo.count(&managers, &OPEN_STATUSES, None).await?, 3);

        Ok(())
    }

    /// Expect rejection to clear the vendor and reopen the request
    #[tokio::test]
    async fn reject_reopens_request() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let vendor = test.user().insert_vendor().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let request = test
            .maintenance()
            .insert_request(property.id, None, landlord.id, Priority::Medium)
            .await?;

        let repo = MaintenanceRepository::new(&test.db);
        let assigned = repo
            .assign(request, vendor.id, 200_000, ApprovalStatus::PendingApproval)
            .await?;
        assert_eq!(assigned.status, MaintenanceStatus::Assigned);
        assert_eq!(
            repo.count(
                &Visibility::Vendor(vendor.id),
                &OPEN_STATUSES,
                Some(ApprovalStatus::PendingApproval)
            )
            .await?,
            1
        );

        let rejected = repo.reject(assigned).await?;
        assert_eq!(rejected.vendor_id, None);
        assert_eq!(rejected.status, MaintenanceStatus::Open);
        assert_eq!(rejected.approval_status, Some(ApprovalStatus::Rejected));

        Ok(())
    }

    /// Expect completion to stamp completed_at and comments to come back in order
    #[tokio::test]
    async fn completes_and_comments() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let request = test
            .maintenance()
            .insert_request(property.id, None, landlord.id, Priority::Low)
            .await?;

        let repo = MaintenanceRepository::new(&test.db);
        repo.add_comment(request.id, landlord.id, "first".to_string())
            .await?;
        repo.add_comment(request.id, landlord.id, "second".to_string())
            .await?;
        let completed = repo
            .set_status(request, MaintenanceStatus::Completed)
            .await?;

        assert!(completed.completed_at.is_some());
        let bodies: Vec<String> = repo
            .comments(completed.id)
            .await?
            .into_iter()
            .map(|comment| comment.body)
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);

        Ok(())
    }
}
