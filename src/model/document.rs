use chrono::NaiveDateTime;
use entity::document::DocumentCategory;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub id: i32,
    pub property_id: i32,
    pub lease_id: Option<i32>,
    pub uploaded_by: i32,
    pub title: String,
    #[schema(value_type = String, example = "lease_agreement")]
    pub category: DocumentCategory,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub version: i32,
    /// Version change awaiting approval of both sides
    pub pending_change: Option<PendingChangeDto>,
    /// Deletion awaiting approval of both sides
    pub deletion_request: Option<ApprovalStateDto>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApprovalStateDto {
    pub landlord_approved: bool,
    pub tenant_approved: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingChangeDto {
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub proposed_by: i32,
    pub approval: ApprovalStateDto,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentVersionDto {
    pub version: i32,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: i32,
    pub created_at: NaiveDateTime,
}

impl From<entity::document_version::Model> for DocumentVersionDto {
    fn from(version: entity::document_version::Model) -> Self {
        Self {
            version: version.version,
            file_name: version.file_name,
            storage_key: version.storage_key,
            content_type: version.content_type,
            size_bytes: version.size_bytes,
            uploaded_by: version.uploaded_by,
            created_at: version.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetailDto {
    pub document: DocumentDto,
    pub versions: Vec<DocumentVersionDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDocumentDto {
    /// Required unless `lease_id` is given
    pub property_id: Option<i32>,
    pub lease_id: Option<i32>,
    pub title: String,
    #[schema(value_type = String, example = "notice")]
    pub category: DocumentCategory,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewVersionDto {
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentListQuery {
    pub property_id: Option<i32>,
    pub lease_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl DocumentListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}
