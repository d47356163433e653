//! Point-to-point routing and normalization of provider units.

use crate::error::RoutingFailure;
use crate::models::{Coordinate, RankedRoute, RouteSegment, RouteStep};
use crate::provider::{ProviderLeg, ProviderRoute, ProviderStep, RouteProvider};

pub const UNKNOWN_ROAD: &str = "Unknown road";

/// Whole minutes for a segment duration: 0 when nothing to travel, never
/// less than 1 otherwise.
pub fn segment_minutes(duration_s: f64) -> u64 {
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return 0;
    }
    ((duration_s / 60.0).round() as u64).max(1)
}

fn step_minutes(duration_s: f64) -> u64 {
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return 0;
    }
    (duration_s / 60.0).round() as u64
}

fn whole_meters(distance_m: f64) -> u64 {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return 0;
    }
    distance_m.round() as u64
}

/// Collapse maneuver type and modifier into one instruction.
pub fn instruction(maneuver_type: &str, modifier: Option<&str>) -> String {
    match modifier.map(str::trim).filter(|m| !m.is_empty()) {
        Some(modifier) => format!("{} {}", maneuver_type, modifier),
        None => maneuver_type.to_string(),
    }
}

pub fn normalize_step(step: &ProviderStep) -> RouteStep {
    RouteStep {
        instruction: instruction(&step.maneuver_type, step.modifier.as_deref()),
        distance_meters: whole_meters(step.distance_m),
        duration_minutes: step_minutes(step.duration_s),
        road_name: step
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_ROAD)
            .to_string(),
    }
}

pub fn normalize_route(route: &ProviderRoute) -> RouteSegment {
    RouteSegment {
        distance_meters: whole_meters(route.distance_m),
        duration_minutes: segment_minutes(route.duration_s),
        geometry: route.geometry.clone(),
        steps: route
            .legs
            .iter()
            .flat_map(|leg| leg.steps.iter().map(normalize_step))
            .collect(),
    }
}

pub fn normalize_leg(leg: &ProviderLeg) -> RouteSegment {
    RouteSegment {
        distance_meters: whole_meters(leg.distance_m),
        duration_minutes: segment_minutes(leg.duration_s),
        geometry: leg.geometry.clone(),
        steps: leg.steps.iter().map(normalize_step).collect(),
    }
}

/// Primary route between two points. Failures are not retried here.
pub async fn route(
    provider: &dyn RouteProvider,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<RouteSegment, RoutingFailure> {
    let routes = provider.routes(origin, destination, 0).await?;
    routes
        .first()
        .map(normalize_route)
        .ok_or(RoutingFailure::NoRoute)
}

/// Up to `1 + alternatives` routes, each tagged with the provider's rank.
pub async fn route_alternatives(
    provider: &dyn RouteProvider,
    origin: Coordinate,
    destination: Coordinate,
    alternatives: u32,
) -> Result<Vec<RankedRoute>, RoutingFailure> {
    let routes = provider.routes(origin, destination, alternatives).await?;
    if routes.is_empty() {
        return Err(RoutingFailure::NoRoute);
    }
    Ok(routes
        .iter()
        .take(alternatives as usize + 1)
        .enumerate()
        .map(|(route_index, route)| RankedRoute {
            route_index,
            segment: normalize_route(route),
        })
        .collect())
}
