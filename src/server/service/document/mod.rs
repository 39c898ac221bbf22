//! Documents with versioning; lease documents change or disappear only once
//! the landlord side and the tenant side both approve.

mod approval;


pub use approval::{ApprovalState, DocumentMetadata, PendingVersion, Side};

use entity::{app_user::Role, notification::NotificationKind};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::DeletionResultDto,
        document::{
            CreateDocumentDto, DocumentDetailDto, DocumentDto, DocumentListQuery,
            DocumentVersionDto, NewVersionDto,
        },
    },
    server::{
        data::{
            document::{
                DocumentFile, DocumentFilter, DocumentRepository, DocumentVisibility, NewDocument,
            },
            lease_tenant::LeaseTenantRepository,
            Page, Scope,
        },
        error::{auth::AuthError, request::RequestError, Error},
        service::{access::Actor, lookup, notification::notify, validate},
    },
};

pub struct DocumentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: DocumentListQuery,
    ) -> Result<Page<DocumentDto>, Error> {
        let page = query.page_query();
        let visibility = match actor.role {
            Role::Tenant => DocumentVisibility::Leases(
                LeaseTenantRepository::new(self.db)
                    .lease_ids_for_tenant(actor.id)
                    .await?,
            ),
            Role::Vendor => DocumentVisibility::Properties(Scope::Only(Vec::new())),
            _ => DocumentVisibility::Properties(actor.managed_properties(self.db).await?),
        };
        let filter = DocumentFilter {
            property_id: query.property_id,
            lease_id: query.lease_id,
        };

        let documents = DocumentRepository::new(self.db)
            .list(&visibility, &filter, page.page(), page.limit())
            .await?;

        documents.try_map(document_dto)
    }

    /// Document with its version history and approval state
    pub async fn get(&self, actor: &Actor, document_id: i32) -> Result<DocumentDetailDto, Error> {
        let document = self.get_document(document_id).await?;
        self.side_of(actor, &document).await?;

        let versions = DocumentRepository::new(self.db)
            .versions(document.id)
            .await?;

        Ok(DocumentDetailDto {
            document: document_dto(document)?,
            versions: versions.into_iter().map(DocumentVersionDto::from).collect(),
        })
    }

    /// Stores a document on a property, or on a lease when `lease_id` is given
    pub async fn create(
        &self,
        actor: &Actor,
        document: CreateDocumentDto,
    ) -> Result<DocumentDto, Error> {
        let (property, lease_id) = match (document.lease_id, document.property_id) {
            (Some(lease_id), property_id) => {
                let (lease, _, property) = lookup::lease(self.db, lease_id).await?;
                if property_id.is_some_and(|id| id != property.id) {
                    return Err(RequestError::validation(format!(
                        "Lease {} does not belong to property {}",
                        lease.id,
                        property_id.unwrap_or_default()
                    ))
                    .into());
                }
                (property, Some(lease.id))
            }
            (None, Some(property_id)) => (lookup::property(self.db, property_id).await?, None),
            (None, None) => {
                return Err(
                    RequestError::validation("Either lease_id or property_id is required").into(),
                )
            }
        };

        let allowed = actor.manages(&property)
            || match lease_id {
                Some(lease_id) => actor.is_lease_party(self.db, lease_id).await?,
                None => false,
            };
        if !allowed {
            return Err(AuthError::forbidden(format!(
                "User {} cannot add documents to property {}",
                actor.id, property.id
            ))
            .into());
        }

        let title = validate::required_text("title", &document.title)?;
        let file = validate_file(
            document.file_name,
            document.storage_key,
            document.content_type,
            document.size_bytes,
        )?;

        let created = DocumentRepository::new(self.db)
            .create(NewDocument {
                property_id: property.id,
                lease_id,
                uploaded_by: actor.id,
                title,
                category: document.category,
                file,
            })
            .await?;

        document_dto(created)
    }

    /// Uploads a new version: applied at once on property documents, proposed
    /// to the other side on lease documents
    pub async fn add_version(
        &self,
        actor: &Actor,
        document_id: i32,
        version: NewVersionDto,
    ) -> Result<DocumentDto, Error> {
        let document = self.get_document(document_id).await?;
        let side = self.side_of(actor, &document).await?;
        let file = validate_file(
            version.file_name,
            version.storage_key,
            version.content_type,
            version.size_bytes,
        )?;
        let mut metadata = DocumentMetadata::parse(&document.metadata)?;
        let document_repo = DocumentRepository::new(self.db);

        if document.lease_id.is_none() {
            let metadata = metadata.to_value()?;
            let updated = document_repo
                .apply_version(document, file, actor.id, metadata)
                .await?;

            return document_dto(updated);
        }

        if metadata.pending_version.is_some() {
            return Err(RequestError::conflict(format!(
                "Document {} already has a change awaiting approval",
                document.id
            ))
            .into());
        }

        metadata.pending_version = Some(PendingVersion {
            file,
            proposed_by: actor.id,
            approval: ApprovalState::proposed_by(side),
        });
        let updated = document_repo
            .set_metadata(document, metadata.to_value()?)
            .await?;

        self.notify_side(
            &updated,
            side.other(),
            actor,
            NotificationKind::DocumentChange,
            format!("Change proposed to {}", updated.title),
        )
        .await?;

        document_dto(updated)
    }

    /// Approves the pending change for the actor's side, applying it once both
    /// sides agree
    pub async fn mutual_approve(&self, actor: &Actor, document_id: i32) -> Result<DocumentDto, Error> {
        let document = self.get_document(document_id).await?;
        let side = self.side_of(actor, &document).await?;
        let mut metadata = DocumentMetadata::parse(&document.metadata)?;

        let Some(mut pending) = metadata.pending_version.take() else {
            return Err(RequestError::invalid_state(format!(
                "Document {} has no change awaiting approval",
                document.id
            ))
            .into());
        };
        pending.approval.approve(side);

        let document_repo = DocumentRepository::new(self.db);
        let updated = if pending.approval.is_complete() {
            document_repo
                .apply_version(
                    document,
                    pending.file,
                    pending.proposed_by,
                    metadata.to_value()?,
                )
                .await?
        } else {
            metadata.pending_version = Some(pending);
            document_repo
                .set_metadata(document, metadata.to_value()?)
                .await?
        };

        document_dto(updated)
    }

    /// Deletes a property document, or records the actor's side's approval to
    /// delete a lease document
    pub async fn delete(&self, actor: &Actor, document_id: i32) -> Result<DeletionResultDto, Error> {
        let document = self.get_document(document_id).await?;
        let side = self.side_of(actor, &document).await?;

        if document.lease_id.is_none() {
            DocumentRepository::new(self.db).delete(document.id).await?;

            return Ok(DeletionResultDto { deleted: true });
        }

        let mut metadata = DocumentMetadata::parse(&document.metadata)?;
        let requested = metadata.deletion.is_none();
        let mut deletion = metadata.deletion.unwrap_or_default();
        deletion.approve(side);
        metadata.deletion = Some(deletion);

        let result = self.settle_deletion(document, metadata).await?;
        if let Some(document) = result.as_ref().filter(|_| requested) {
            self.notify_side(
                document,
                side.other(),
                actor,
                NotificationKind::DocumentDeletion,
                format!("Deletion requested for {}", document.title),
            )
            .await?;
        }

        Ok(DeletionResultDto {
            deleted: result.is_none(),
        })
    }

    pub async fn approve_deletion(
        &self,
        actor: &Actor,
        document_id: i32,
    ) -> Result<DeletionResultDto, Error> {
        let document = self.get_document(document_id).await?;
        let side = self.side_of(actor, &document).await?;
        let mut metadata = DocumentMetadata::parse(&document.metadata)?;

        let Some(deletion) = metadata.deletion.as_mut() else {
            return Err(RequestError::invalid_state(format!(
                "Document {} has no deletion awaiting approval",
                document.id
            ))
            .into());
        };
        deletion.approve(side);

        let result = self.settle_deletion(document, metadata).await?;

        Ok(DeletionResultDto {
            deleted: result.is_none(),
        })
    }

    /// Deletes the row once both sides approved, otherwise stores the new
    /// state and returns the document
    async fn settle_deletion(
        &self,
        document: entity::document::Model,
        metadata: DocumentMetadata,
    ) -> Result<Option<entity::document::Model>, Error> {
        let document_repo = DocumentRepository::new(self.db);

        if metadata.deletion.is_some_and(|deletion| deletion.is_complete()) {
            document_repo.delete(document.id).await?;
            tracing::info!("Deleted document {} after mutual approval", document.id);

            return Ok(None);
        }

        let updated = document_repo
            .set_metadata(document, metadata.to_value()?)
            .await?;

        Ok(Some(updated))
    }

    async fn get_document(&self, document_id: i32) -> Result<entity::document::Model, Error> {
        DocumentRepository::new(self.db)
            .get(document_id)
            .await?
            .ok_or_else(|| RequestError::NotFound("Document").into())
    }

    /// The side the actor acts for, 403 when neither
    async fn side_of(&self, actor: &Actor, document: &entity::document::Model) -> Result<Side, Error> {
        let property = lookup::property(self.db, document.property_id).await?;
        if actor.manages(&property) {
            return Ok(Side::Landlord);
        }
        if let Some(lease_id) = document.lease_id {
            if actor.is_lease_party(self.db, lease_id).await? {
                return Ok(Side::Tenant);
            }
        }

        Err(AuthError::forbidden(format!(
            "User {} cannot access document {}",
            actor.id, document.id
        ))
        .into())
    }

    async fn notify_side(
        &self,
        document: &entity::document::Model,
        side: Side,
        actor: &Actor,
        kind: NotificationKind,
        title: String,
    ) -> Result<u64, Error> {
        let recipients = match side {
            Side::Landlord => {
                let property = lookup::property(self.db, document.property_id).await?;
                std::iter::once(property.landlord_id)
                    .chain(property.pmc_id)
                    .collect()
            }
            Side::Tenant => match document.lease_id {
                Some(lease_id) => {
                    LeaseTenantRepository::new(self.db)
                        .tenant_ids(lease_id)
                        .await?
                }
                None => Vec::new(),
            },
        };

        notify(
            self.db,
            &recipients,
            Some(actor.id),
            kind,
            title,
            "Your approval is needed",
            Some(format!("/documents/{}", document.id)),
        )
        .await
    }
}

fn validate_file(
    file_name: String,
    storage_key: String,
    content_type: String,
    size_bytes: i64,
) -> Result<DocumentFile, Error> {
    validate::non_negative("size_bytes", size_bytes)?;

    Ok(DocumentFile {
        file_name: validate::required_text("file_name", &file_name)?,
        storage_key: validate::required_text("storage_key", &storage_key)?,
        content_type: validate::required_text("content_type", &content_type)?,
        size_bytes,
    })
}

fn document_dto(document: entity::document::Model) -> Result<DocumentDto, Error> {
    let metadata = DocumentMetadata::parse(&document.metadata)?;

    Ok(DocumentDto {
        id: document.id,
        property_id: document.property_id,
        lease_id: document.lease_id,
        uploaded_by: document.uploaded_by,
        title: document.title,
        category: document.category,
        file_name: document.file_name,
        storage_key: document.storage_key,
        content_type: document.content_type,
        size_bytes: document.size_bytes,
        version: document.version,
        pending_change: metadata.pending_version.map(Into::into),
        deletion_request: metadata.deletion.map(Into::into),
        created_at: document.created_at,
        updated_at: document.updated_at,
    })
}
