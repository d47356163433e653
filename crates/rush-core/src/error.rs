//! Failure taxonomy for geocoding, routing and prediction.

use thiserror::Error;

use crate::geocoder::GeocodeAttempt;

/// Any failure talking to a third-party provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(String),
    #[error("provider request timed out")]
    Timeout,
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

/// No provider result after every query variant and retry.
#[derive(Debug, Clone, Error)]
#[error("unable to geocode {place}")]
pub struct GeocodeFailure {
    pub place: String,
    pub attempts: Vec<GeocodeAttempt>,
}

#[derive(Debug, Clone, Error)]
pub enum RoutingFailure {
    #[error("no route found")]
    NoRoute,
    #[error("routing provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// First failure met while stitching a multi-stop itinerary.
#[derive(Debug, Clone, Error)]
pub enum AggregationFailure {
    #[error("at least 2 waypoints are required")]
    TooFewWaypoints,
    #[error("unable to geocode location: {}", .0.place)]
    Geocode(#[from] GeocodeFailure),
    #[error("routing failed between {from} and {to}: {source}")]
    Routing {
        from: String,
        to: String,
        #[source]
        source: RoutingFailure,
    },
}

impl AggregationFailure {
    /// The waypoint that could not be resolved or routed from.
    pub fn waypoint(&self) -> Option<&str> {
        match self {
            Self::TooFewWaypoints => None,
            Self::Geocode(failure) => Some(&failure.place),
            Self::Routing { from, .. } => Some(from),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OptimizationFailure {
    #[error("at least 2 waypoints are required")]
    TooFewWaypoints,
    #[error("unable to geocode location: {}", .0.place)]
    Geocode(#[from] GeocodeFailure),
    #[error("unable to optimize waypoints")]
    NoTrip,
    #[error("provider returned an invalid trip: {0}")]
    InvalidTrip(String),
    #[error("trip provider error: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Error)]
pub enum PredictionFailure {
    #[error("prediction process exited with status {code:?}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("unparseable prediction output: {output:?}")]
    Unparseable { output: String, stderr: String },
    #[error("failed to launch prediction process: {0}")]
    Spawn(String),
    #[error("prediction timed out")]
    Timeout,
}

impl PredictionFailure {
    /// Diagnostic text produced by the scoring process, if any.
    pub fn details(&self) -> String {
        match self {
            Self::Exit { stderr, .. } | Self::Unparseable { stderr, .. } => stderr.clone(),
            Self::Spawn(message) => message.clone(),
            Self::Timeout => String::new(),
        }
    }
}
