//! Capabilities the planner needs from third-party services.
//!
//! The traits return boxed futures so implementations can be chosen at
//! runtime (`Arc<dyn RouteProvider>`) and swapped for fakes in tests.

use futures::future::BoxFuture;

use crate::error::ProviderError;
use crate::models::Coordinate;

/// Free-text geocoding. An empty result means "no match", not an error.
pub trait GeocodeProvider: Send + Sync {
    fn search<'a>(&'a self, query: &'a str)
        -> BoxFuture<'a, Result<Vec<Coordinate>, ProviderError>>;
}

/// A single maneuver in provider units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderStep {
    pub maneuver_type: String,
    pub modifier: Option<String>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderLeg {
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: Vec<Coordinate>,
    pub steps: Vec<ProviderStep>,
}

/// A route as the provider reported it, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: Vec<Coordinate>,
    pub legs: Vec<ProviderLeg>,
}

/// An optimized visiting order.
///
/// `waypoint_index[i]` is the position in the trip of input stop `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderTrip {
    pub route: ProviderRoute,
    pub waypoint_index: Vec<usize>,
}

pub trait RouteProvider: Send + Sync {
    /// Short identifier reported back to clients (`osrm`, `google`).
    fn name(&self) -> &'static str;

    /// Routes from `origin` to `destination`, primary route first.
    /// `alternatives > 0` asks for up to that many extra routes.
    fn routes<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> BoxFuture<'a, Result<Vec<ProviderRoute>, ProviderError>>;
}

pub trait TripProvider: Send + Sync {
    /// `Ok(None)` when the provider found no trip.
    fn trip<'a>(
        &'a self,
        stops: &'a [Coordinate],
    ) -> BoxFuture<'a, Result<Option<ProviderTrip>, ProviderError>>;
}
