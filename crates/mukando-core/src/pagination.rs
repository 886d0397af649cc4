//! Pagination utilities for list endpoints.
//!
//! Offset-based pagination via `limit` and `offset` query parameters:
//!
//! - `limit`: maximum number of items to return (1-100, default: 20)
//! - `offset`: number of items to skip from the beginning (default: 0)
//!
//! Handlers deserialize [`PaginationParams`] from the query string and wrap
//! their results in [`Paginated`], which carries the page plus a
//! [`PaginationMeta`] block in the response body.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which are treated as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Query parameters for paginated list endpoints.
///
/// `limit` is clamped to the range [1, 100]; `offset` is clamped to a
/// minimum of 0.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(20),
            offset: Some(0),
        }
    }
}

impl PaginationParams {
    /// Returns the effective limit, clamped to [1, 100]. Defaults to 20.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Returns the effective offset, clamped to a minimum of 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Metadata block included in paginated responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// The limit that was applied
    pub limit: i64,
    /// Number of items skipped
    pub offset: i64,
    /// Whether more items exist after this page
    pub has_more: bool,
}

/// A page of items plus its pagination metadata.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "data": [...],
///   "meta": { "total": 42, "limit": 20, "offset": 0, "has_more": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        let has_more = offset + (data.len() as i64) < total;

        Self {
            data,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        }
    }
}
