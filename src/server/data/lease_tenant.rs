use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

pub struct LeaseTenantRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LeaseTenantRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn add(
        &self,
        lease_id: i32,
        tenant_id: i32,
    ) -> Result<entity::lease_tenant::Model, DbErr> {
        entity::lease_tenant::ActiveModel {
            lease_id: ActiveValue::Set(lease_id),
            tenant_id: ActiveValue::Set(tenant_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn remove(&self, lease_id: i32, tenant_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::LeaseTenant::delete_many()
            .filter(entity::lease_tenant::Column::LeaseId.eq(lease_id))
            .filter(entity::lease_tenant::Column::TenantId.eq(tenant_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn tenant_ids(&self, lease_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::LeaseTenant::find()
            .select_only()
            .column(entity::lease_tenant::Column::TenantId)
            .filter(entity::lease_tenant::Column::LeaseId.eq(lease_id))
            .order_by_asc(entity::lease_tenant::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// `(lease_id, tenant_id)` pairs for the given leases
    pub async fn pairs_for_leases(&self, lease_ids: &[i32]) -> Result<Vec<(i32, i32)>, DbErr> {
        entity::prelude::LeaseTenant::find()
            .select_only()
            .column(entity::lease_tenant::Column::LeaseId)
            .column(entity::lease_tenant::Column::TenantId)
            .filter(entity::lease_tenant::Column::LeaseId.is_in(lease_ids.iter().copied()))
            .order_by_asc(entity::lease_tenant::Column::Id)
            .into_tuple::<(i32, i32)>()
            .all(self.db)
            .await
    }

    pub async fn lease_ids_for_tenant(&self, tenant_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::LeaseTenant::find()
            .select_only()
            .column(entity::lease_tenant::Column::LeaseId)
            .filter(entity::lease_tenant::Column::TenantId.eq(tenant_id))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    pub async fn is_party(&self, lease_id: i32, tenant_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::LeaseTenant::find()
            .filter(entity::lease_tenant::Column::LeaseId.eq(lease_id))
            .filter(entity::lease_tenant::Column::TenantId.eq(tenant_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use tenantry_test_utils::prelude::*;

    use super::LeaseTenantRepository;

    /// Expect membership queries to reflect adds and removals
    #[tokio::test]
    async fn tracks_lease_parties() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let first = test.user().insert_tenant().await?;
        let second = test.user().insert_tenant().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let lease = test.lease().insert_draft_lease(unit.id, &[first.id]).await?;

        let repo = LeaseTenantRepository::new(&test.db);
        repo.add(lease.id, second.id).await?;

        assert_eq!(repo.tenant_ids(lease.id).await?, vec![first.id, second.id]);
        assert!(repo.is_party(lease.id, second.id).await?);
        assert_eq!(repo.lease_ids_for_tenant(first.id).await?, vec![lease.id]);

        assert_eq!(repo.remove(lease.id, first.id).await?, 1);
        assert!(!repo.is_party(lease.id, first.id).await?);
        assert_eq!(
            repo.pairs_for_leases(&[lease.id]).await?,
            vec![(lease.id, second.id)]
        );

        Ok(())
    }
}
