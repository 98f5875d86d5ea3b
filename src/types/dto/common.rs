use poem_openapi::Object;

use crate::types::internal::business::PageInfo;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// `healthy` when the database answers, `degraded` otherwise
    pub status: String,

    /// Database reachability: `up` or `down`
    pub database: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Success envelope without a payload
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination metadata for list endpoints
#[derive(Object, Debug, Clone, PartialEq)]
pub struct PaginationResponse {
    /// Total number of matching records
    pub total: u64,

    /// Current page (1-based)
    pub page: u64,

    /// Page size
    pub limit: u64,

    /// Total number of pages
    pub pages: u64,
}

impl From<PageInfo> for PaginationResponse {
    fn from(info: PageInfo) -> Self {
        Self {
            total: info.total,
            page: info.page,
            limit: info.limit,
            pages: info.pages,
        }
    }
}
