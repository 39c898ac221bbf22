use chrono::NaiveDateTime;
use entity::{app_user::Role, invitation::InvitationStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InvitationDto {
    pub id: i32,
    pub email: String,
    #[schema(value_type = String, example = "tenant")]
    pub role: Role,
    pub invited_by: i32,
    pub lease_id: Option<i32>,
    #[schema(value_type = String, example = "pending")]
    pub status: InvitationStatus,
    pub expires_at: NaiveDateTime,
    pub accepted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<entity::invitation::Model> for InvitationDto {
    fn from(invitation: entity::invitation::Model) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email,
            role: invitation.role,
            invited_by: invitation.invited_by,
            lease_id: invitation.lease_id,
            status: invitation.status,
            expires_at: invitation.expires_at,
            accepted_at: invitation.accepted_at,
            created_at: invitation.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateInvitationDto {
    pub email: String,
    /// `tenant`, `vendor` or `pmc`
    #[schema(value_type = String, example = "tenant")]
    pub role: Role,
    /// Lease the invited tenant joins on acceptance
    pub lease_id: Option<i32>,
}

/// What an invitee sees before accepting
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InvitationPreviewDto {
    pub email: String,
    #[schema(value_type = String, example = "tenant")]
    pub role: Role,
    #[schema(value_type = String, example = "pending")]
    pub status: InvitationStatus,
    pub inviter_name: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AcceptInvitationDto {
    pub name: String,
    pub phone: Option<String>,
}
