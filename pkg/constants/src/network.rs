//! Network constants.

/// Default port the quotad API server listens on.
pub const DEFAULT_API_PORT: u16 = 7070;

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
