//! Pagination defaults and lenient `?limit=&offset=` parsing.
//!
//! Query values arrive as raw strings so that garbage input degrades to the
//! defaults instead of rejecting the whole listing request.

/// Page size used when `limit` is missing, unparsable or negative.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound on a single page.
pub const MAX_LIMIT: i64 = 100;

/// Offset used when `offset` is missing, unparsable or negative.
pub const DEFAULT_OFFSET: i64 = 0;

/// A validated `(limit, offset)` pair, safe to bind into `LIMIT $n OFFSET $m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Build a page from raw query-string values.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: parse_limit(limit),
            offset: parse_offset(offset),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

/// Parse a user-provided limit, falling back to [`DEFAULT_LIMIT`] and capping
/// at [`MAX_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> i64 {
    match parse_non_negative(raw) {
        Some(limit) => limit.min(MAX_LIMIT),
        None => DEFAULT_LIMIT,
    }
}

/// Parse a user-provided offset, falling back to [`DEFAULT_OFFSET`].
pub fn parse_offset(raw: Option<&str>) -> i64 {
    parse_non_negative(raw).unwrap_or(DEFAULT_OFFSET)
}

fn parse_non_negative(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
}
