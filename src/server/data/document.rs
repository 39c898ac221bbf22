use chrono::Utc;
use entity::document::DocumentCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::server::data::{fetch_page, Page, Scope};

/// Stored file fields shared by a document and its versions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
}

#[derive(Clone, Debug)]
pub struct NewDocument {
    pub property_id: i32,
    pub lease_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    pub category: DocumentCategory,
    pub file: DocumentFile,
}

/// Which documents a caller can see
#[derive(Clone, Debug)]
pub enum DocumentVisibility {
    Properties(Scope),
    Leases(Vec<i32>),
}

#[derive(Clone, Debug, Default)]
pub struct DocumentFilter {
    pub property_id: Option<i32>,
    pub lease_id: Option<i32>,
}

pub struct DocumentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DocumentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a document at version 1 together with its first version row
    pub async fn create(&self, document: NewDocument) -> Result<entity::document::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let created = entity::document::ActiveModel {
            property_id: ActiveValue::Set(document.property_id),
            lease_id: ActiveValue::Set(document.lease_id),
            uploaded_by: ActiveValue::Set(document.uploaded_by),
            title: ActiveValue::Set(document.title),
            category: ActiveValue::Set(document.category),
            file_name: ActiveValue::Set(document.file.file_name.clone()),
            storage_key: ActiveValue::Set(document.file.storage_key.clone()),
            content_type: ActiveValue::Set(document.file.content_type.clone()),
            size_bytes: ActiveValue::Set(document.file.size_bytes),
            version: ActiveValue::Set(1),
            metadata: ActiveValue::Set(serde_json::json!({})),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.insert_version(created.id, 1, document.file, document.uploaded_by)
            .await?;

        Ok(created)
    }

    async fn insert_version(
        &self,
        document_id: i32,
        version: i32,
        file: DocumentFile,
        uploaded_by: i32,
    ) -> Result<entity::document_version::Model, DbErr> {
        entity::document_version::ActiveModel {
            document_id: ActiveValue::Set(document_id),
            version: ActiveValue::Set(version),
            file_name: ActiveValue::Set(file.file_name),
            storage_key: ActiveValue::Set(file.storage_key),
            content_type: ActiveValue::Set(file.content_type),
            size_bytes: ActiveValue::Set(file.size_bytes),
            uploaded_by: ActiveValue::Set(uploaded_by),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(&self, document_id: i32) -> Result<Option<entity::document::Model>, DbErr> {
        entity::prelude::Document::find_by_id(document_id)
            .one(self.db)
            .await
    }

    pub async fn list(
        &self,
        visibility: &DocumentVisibility,
        filter: &DocumentFilter,
        page: u64,
        limit: u64,
    ) -> Result<Page<entity::document::Model>, DbErr> {
        let mut select = entity::prelude::Document::find()
            .order_by_desc(entity::document::Column::UpdatedAt)
            .order_by_desc(entity::document::Column::Id);
        select = match visibility {
            DocumentVisibility::Properties(scope) => {
                scope.apply(select, entity::document::Column::PropertyId)
            }
            DocumentVisibility::Leases(lease_ids) => select
                .filter(entity::document::Column::LeaseId.is_in(lease_ids.iter().copied())),
        };
        if let Some(property_id) = filter.property_id {
            select = select.filter(entity::document::Column::PropertyId.eq(property_id));
        }
        if let Some(lease_id) = filter.lease_id {
            select = select.filter(entity::document::Column::LeaseId.eq(lease_id));
        }

        fetch_page(self.db, select, page, limit).await
    }

    pub async fn set_metadata(
        &self,
        document: entity::document::Model,
        metadata: serde_json::Value,
    ) -> Result<entity::document::Model, DbErr> {
        let mut document_am = document.into_active_model();
        document_am.metadata = ActiveValue::Set(metadata);
        document_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        document_am.update(self.db).await
    }

    /// Replaces the current file, bumping the version and recording it in the history
    pub async fn apply_version(
        &self,
        document: entity::document::Model,
        file: DocumentFile,
        uploaded_by: i32,
        metadata: serde_json::Value,
    ) -> Result<entity::document::Model, DbErr> {
        let version = document.version + 1;
        let mut document_am = document.into_active_model();
        document_am.file_name = ActiveValue::Set(file.file_name.clone());
        document_am.storage_key = ActiveValue::Set(file.storage_key.clone());
        document_am.content_type = ActiveValue::Set(file.content_type.clone());
        document_am.size_bytes = ActiveValue::Set(file.size_bytes);
        document_am.version = ActiveValue::Set(version);
        document_am.metadata = ActiveValue::Set(metadata);
        document_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        let updated = document_am.update(self.db).await?;
        self.insert_version(updated.id, version, file, uploaded_by)
            .await?;

        Ok(updated)
    }

    pub async fn delete(&self, document_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Document::delete_by_id(document_id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn versions(
        &self,
        document_id: i32,
    ) -> Result<Vec<entity::document_version::Model>, DbErr> {
        entity::prelude::DocumentVersion::find()
            .filter(entity::document_version::Column::DocumentId.eq(document_id))
            .order_by_asc(entity::document_version::Column::Version)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use entity::document::DocumentCategory;
    use tenantry_test_utils::prelude::*;

    use super::{DocumentFile, DocumentFilter, DocumentRepository, DocumentVisibility, NewDocument};
    use crate::server::data::Scope;

    fn file(name: &str) -> DocumentFile {
        DocumentFile {
            file_name: name.to_string(),
            storage_key: format!("uploads/{}", name),
            content_type: "application/pdf".to_string(),
            size_bytes: 2048,
        }
    }

    /// Expect creation and version application to keep the history in step
    #[tokio::test]
    async fn tracks_versions() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;

        let repo = DocumentRepository::new(&test.db);
        let document = repo
            .create(NewDocument {
                property_id: property.id,
                lease_id: None,
                uploaded_by: landlord.id,
                title: "Inspection".to_string(),
                category: DocumentCategory::Inspection,
                file: file("inspection.pdf"),
            })
            .await?;
        assert_eq!(document.version, 1);

        let updated = repo
            .apply_version(
                document,
                file("inspection-v2.pdf"),
                landlord.id,
                serde_json::json!({}),
            )
            .await?;
        assert_eq!(updated.version, 2);
        assert_eq!(updated.file_name, "inspection-v2.pdf");

        let versions = repo.versions(updated.id).await?;
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[1].storage_key, "uploads/inspection-v2.pdf");

        Ok(())
    }

    /// Expect lease visibility to hide property-level documents
    #[tokio::test]
    async fn lease_visibility() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let landlord = test.user().insert_landlord().await?;
        let property = test.property().insert_property(landlord.id).await?;
        let unit = test.property().insert_unit(property.id).await?;
        let lease = test.lease().insert_active_lease(unit.id, &[]).await?;
        test.document()
            .insert_document(property.id, None, landlord.id)
            .await?;
        let lease_document = test
            .document()
            .insert_document(property.id, Some(lease.id), landlord.id)
            .await?;

        let repo = DocumentRepository::new(&test.db);
        let leases = repo
            .list(
                &DocumentVisibility::Leases(vec![lease.id]),
                &DocumentFilter::default(),
                1,
                20,
            )
            .await?;
        assert_eq!(leases.total, 1);
        assert_eq!(leases.items[0].id, lease_document.id);

        let managers = repo
            .list(
                &DocumentVisibility::Properties(Scope::All),
                &DocumentFilter {
                    property_id: Some(property.id),
                    lease_id: None,
                },
                1,
                20,
            )
            .await?;
        assert_eq!(managers.total, 2);

        assert_eq!(repo.delete(lease_document.id).await?, 1);
        assert!(repo.get(lease_document.id).await?.is_none());

        Ok(())
    }
}
