//! HTTP API for route planning and congestion prediction.

pub mod directions;
pub mod error;
pub mod predict;
pub mod rate_limit;
pub mod request_id;
mod routes;
pub mod views;

pub use routes::{app, create_router};

/// RFC 3339 UTC timestamp with millisecond precision.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
