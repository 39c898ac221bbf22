use chrono::NaiveDateTime;
use entity::maintenance_request::{ApprovalStatus, MaintenanceStatus, Priority};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageQuery;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRequestDto {
    pub id: i32,
    /// `MNT-<YYMMDD>-<6 hex>`
    pub ticket_number: String,
    pub property_id: i32,
    pub unit_id: Option<i32>,
    pub requested_by: i32,
    pub vendor_id: Option<i32>,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "high")]
    pub priority: Priority,
    #[schema(value_type = String, example = "open")]
    pub status: MaintenanceStatus,
    #[schema(value_type = Option<String>, example = "approved")]
    pub approval_status: Option<ApprovalStatus>,
    pub estimated_cost_cents: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<entity::maintenance_request::Model> for MaintenanceRequestDto {
    fn from(request: entity::maintenance_request::Model) -> Self {
        Self {
            id: request.id,
            ticket_number: request.ticket_number,
            property_id: request.property_id,
            unit_id: request.unit_id,
            requested_by: request.requested_by,
            vendor_id: request.vendor_id,
            title: request.title,
            description: request.description,
            priority: request.priority,
            status: request.status,
            approval_status: request.approval_status,
            estimated_cost_cents: request.estimated_cost_cents,
            created_at: request.created_at,
            updated_at: request.updated_at,
            completed_at: request.completed_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceDetailDto {
    pub request: MaintenanceRequestDto,
    pub comments: Vec<CommentDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentDto {
    pub id: i32,
    pub author_id: i32,
    pub body: String,
    pub created_at: NaiveDateTime,
}

impl From<entity::maintenance_comment::Model> for CommentDto {
    fn from(comment: entity::maintenance_comment::Model) -> Self {
        Self {
            id: comment.id,
            author_id: comment.author_id,
            body: comment.body,
            created_at: comment.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMaintenanceDto {
    pub property_id: i32,
    pub unit_id: Option<i32>,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "medium")]
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignVendorDto {
    pub vendor_id: i32,
    pub estimated_cost_cents: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApprovalDecisionDto {
    pub approve: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMaintenanceStatusDto {
    #[schema(value_type = String, example = "in_progress")]
    pub status: MaintenanceStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentDto {
    pub body: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceListQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<MaintenanceStatus>,
    #[param(value_type = Option<String>)]
    pub priority: Option<Priority>,
    pub property_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl MaintenanceListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }
}
