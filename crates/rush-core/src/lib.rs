//! Rush-hour core: geocoding, route stitching and congestion scoring.
//!
//! Everything network-facing is reached through the provider traits in
//! [`provider`]; the HTTP implementations live in `rush-providers`.

pub mod congestion;
pub mod error;
pub mod geocoder;
pub mod itinerary;
pub mod models;
pub mod optimizer;
pub mod predictor;
pub mod provider;
pub mod router;
pub mod spacer;

pub use congestion::{
    adjusted_duration, clamp_score, congestion_multiplier, estimated_delay, recommended_action,
    CongestionPrediction, Severity,
};
pub use error::{
    AggregationFailure, GeocodeFailure, OptimizationFailure, PredictionFailure, ProviderError,
    RoutingFailure,
};
pub use geocoder::{AttemptOutcome, GeocodeAttempt, GeocodePolicy, Geocoder};
pub use itinerary::{compute_multi_stop_route, geocode_in_order, ItineraryBuilder};
pub use models::{
    Coordinate, Itinerary, ItineraryLeg, OptimizedItinerary, RankedRoute, RouteSegment, RouteStep,
};
pub use optimizer::{optimize_waypoint_order, visiting_order};
pub use predictor::{parse_score_output, predict_score, PredictionInput, Predictor};
pub use provider::{
    GeocodeProvider, ProviderLeg, ProviderRoute, ProviderStep, ProviderTrip, RouteProvider,
    TripProvider,
};
pub use router::{normalize_route, route, route_alternatives, segment_minutes};
pub use spacer::RequestSpacer;
