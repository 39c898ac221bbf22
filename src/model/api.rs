use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// The response when an error occurs with an API request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// Always `false`
    pub success: bool,
    /// The error message
    pub error: String,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Envelope wrapping every successful response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationDto>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: PaginationDto) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationDto {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Outcome of a DELETE request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletionResultDto {
    /// `true` once the row is gone, `false` while a deletion awaits approval
    pub deleted: bool,
}

/// `page` and `limit` query parameters shared by list endpoints
#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number starting at 1
    pub page: Option<u64>,
    /// Items per page, clamped to 1..=100
    pub limit: Option<u64>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}
