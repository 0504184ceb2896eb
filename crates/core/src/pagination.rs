//! Pagination defaults shared by the store and the HTTP layer.

/// Default number of vehicles per page.
pub const DEFAULT_VEHICLE_LIMIT: i64 = 100;

/// Maximum number of vehicles per page.
pub const MAX_VEHICLE_LIMIT: i64 = 500;

/// Default number of log entries per page.
pub const DEFAULT_LOG_LIMIT: i64 = 50;

/// Maximum number of log entries per page.
pub const MAX_LOG_LIMIT: i64 = 500;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of search results.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
