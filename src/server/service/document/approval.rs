//! Two-sided approval state kept in a document's JSON `metadata` column.

use serde::{Deserialize, Serialize};

use crate::{
    model::document::{ApprovalStateDto, PendingChangeDto},
    server::{data::document::DocumentFile, error::Error},
};

/// The party an actor acts for on a document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Any manager of the property
    Landlord,
    /// Any tenant on the document's lease
    Tenant,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Landlord => Self::Tenant,
            Self::Tenant => Self::Landlord,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalState {
    pub landlord_approved: bool,
    pub tenant_approved: bool,
}

impl ApprovalState {
    pub fn proposed_by(side: Side) -> Self {
        let mut state = Self::default();
        state.approve(side);
        state
    }

    pub fn approve(&mut self, side: Side) {
        match side {
            Side::Landlord => self.landlord_approved = true,
            Side::Tenant => self.tenant_approved = true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.landlord_approved && self.tenant_approved
    }
}

impl From<ApprovalState> for ApprovalStateDto {
    fn from(state: ApprovalState) -> Self {
        Self {
            landlord_approved: state.landlord_approved,
            tenant_approved: state.tenant_approved,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingVersion {
    #[serde(flatten)]
    pub file: DocumentFile,
    pub proposed_by: i32,
    pub approval: ApprovalState,
}

impl From<PendingVersion> for PendingChangeDto {
    fn from(pending: PendingVersion) -> Self {
        Self {
            file_name: pending.file.file_name,
            storage_key: pending.file.storage_key,
            content_type: pending.file.content_type,
            size_bytes: pending.file.size_bytes,
            proposed_by: pending.proposed_by,
            approval: pending.approval.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_version: Option<PendingVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion: Option<ApprovalState>,
}

impl DocumentMetadata {
    pub fn parse(value: &serde_json::Value) -> Result<Self, Error> {
        serde_json::from_value(value.clone()).map_err(|e| {
            Error::ParseError(format!("Invalid document metadata: {}", e))
        })
    }

    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        serde_json::to_value(self)
            .map_err(|e| Error::InternalError(format!("Failed to encode document metadata: {}", e)))
    }
}
