use chrono::Utc;
use entity::document::DocumentCategory;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::DocumentModel, TestContext};

impl TestContext {
    pub fn document<'a>(&'a self) -> DocumentFixtures<'a> {
        DocumentFixtures { setup: self }
    }
}

pub struct DocumentFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> DocumentFixtures<'a> {
    /// Insert a version 1 document with empty metadata and its version row.
    pub async fn insert_document(
        &self,
        property_id: i32,
        lease_id: Option<i32>,
        uploaded_by: i32,
    ) -> Result<DocumentModel, TestError> {
        let seq = self.setup.next_sequence();
        let now = Utc::now().naive_utc();
        let file_name = format!("document-{}.pdf", seq);
        let storage_key = format!("documents/{}/{}", property_id, file_name);

        let document = entity::prelude::Document::insert(entity::document::ActiveModel {
            property_id: ActiveValue::Set(property_id),
            lease_id: ActiveValue::Set(lease_id),
            uploaded_by: ActiveValue::Set(uploaded_by),
            title: ActiveValue::Set(format!("Document {}", seq)),
            category: ActiveValue::Set(if lease_id.is_some() {
                DocumentCategory::LeaseAgreement
            } else {
                DocumentCategory::Inspection
            }),
            file_name: ActiveValue::Set(file_name.clone()),
            storage_key: ActiveValue::Set(storage_key.clone()),
            content_type: ActiveValue::Set("application/pdf".to_string()),
            size_bytes: ActiveValue::Set(1024),
            version: ActiveValue::Set(1),
            metadata: ActiveValue::Set(serde_json::json!({})),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        entity::prelude::DocumentVersion::insert(entity::document_version::ActiveModel {
            document_id: ActiveValue::Set(document.id),
            version: ActiveValue::Set(1),
            file_name: ActiveValue::Set(file_name),
            storage_key: ActiveValue::Set(storage_key),
            content_type: ActiveValue::Set("application/pdf".to_string()),
            size_bytes: ActiveValue::Set(1024),
            uploaded_by: ActiveValue::Set(uploaded_by),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        Ok(document)
    }
}
