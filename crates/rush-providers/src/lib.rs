//! Rush Providers - HTTP clients for third-party geocoding and routing
//!
//! Each client implements one or more of the provider traits from
//! `rush-core` so the planner never sees provider wire formats.

mod http;
pub mod google;
pub mod nominatim;
pub mod osrm;

pub use google::GoogleRoutesClient;
pub use nominatim::NominatimClient;
pub use osrm::OsrmClient;
