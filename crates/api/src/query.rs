//! Shared query parameter types for API handlers.

use serde::Deserialize;
use stockroom_core::pagination::Page;
use stockroom_core::ranking;

use crate::error::{AppError, AppResult};

/// Pagination parameters (`?limit=&offset=`).
///
/// Kept as raw strings so that garbage values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PaginationParams {
    pub fn page(&self) -> Page {
        Page::from_query(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// Query of `PATCH /api/goods/prioritize/...` (`?priority=N`).
#[derive(Debug, Default, Deserialize)]
pub struct PriorityParams {
    pub priority: Option<String>,
}

impl PriorityParams {
    /// The requested priority. Missing, non-integer and negative values are
    /// rejected.
    pub fn requested(&self) -> AppResult<i64> {
        let raw = self
            .priority
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("priority is required".to_string()))?;
        let requested: i64 = raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("priority must be an integer, got {raw:?}")))?;
        ranking::validate_requested(requested)?;
        Ok(requested)
    }
}
