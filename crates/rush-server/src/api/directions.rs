//! Route planning endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use rush_core::{
    compute_multi_stop_route, optimize_waypoint_order, route, route_alternatives, Coordinate,
    RouteProvider,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::timestamp;
use crate::api::views::{Endpoint, ItineraryRouteView, LineString, RankedRouteView, RouteView};
use crate::state::AppState;

const DEFAULT_ALTERNATIVES: u32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub routing_service: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub alternatives: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WaypointsRequest {
    pub waypoints: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingService {
    Osrm,
    Google,
}

impl RoutingService {
    pub fn parse(value: Option<&str>) -> Result<Self, ApiError> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("osrm") => Ok(Self::Osrm),
            Some("google") => Ok(Self::Google),
            Some(other) => Err(ApiError::bad_request_with(
                "Unknown routing service",
                "message",
                json!(format!("{:?} is not one of: osrm, google", other)),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Osrm => "osrm",
            Self::Google => "google",
        }
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn endpoints(
    origin: Option<String>,
    destination: Option<String>,
) -> Result<(String, String), ApiError> {
    match (required(origin), required(destination)) {
        (Some(origin), Some(destination)) => Ok((origin, destination)),
        _ => Err(ApiError::bad_request("Origin and destination are required")),
    }
}

fn waypoint_names(request: WaypointsRequest) -> Result<Vec<String>, ApiError> {
    match request.waypoints {
        Some(waypoints) if waypoints.len() >= 2 => Ok(waypoints),
        _ => Err(ApiError::bad_request("At least 2 waypoints are required")),
    }
}

/// Geocode both ends concurrently, each on its own schedule.
async fn geocode_pair(
    state: &AppState,
    origin: &str,
    destination: &str,
) -> Result<(Coordinate, Coordinate), ApiError> {
    let (origin_geocoder, destination_geocoder) = (state.geocoder(), state.geocoder());
    let (from, to) = tokio::join!(
        origin_geocoder.geocode(origin),
        destination_geocoder.geocode(destination)
    );
    match (from, to) {
        (Ok(from), Ok(to)) => Ok((from, to)),
        (from, to) => {
            tracing::error!(
                "Geocoding failed: origin found {}, destination found {}",
                from.is_ok(),
                to.is_ok()
            );
            Err(ApiError::bad_request_with(
                "Unable to geocode origin or destination",
                "details",
                json!({ "originFound": from.is_ok(), "destFound": to.is_ok() }),
            ))
        }
    }
}

fn provider_for(state: &AppState, service: RoutingService) -> Result<&dyn RouteProvider, ApiError> {
    match service {
        RoutingService::Osrm => Ok(state.router()),
        RoutingService::Google => state.google().ok_or_else(|| ApiError::Unavailable {
            error: "Google routing is not configured".to_string(),
            hint: "Set GOOGLE_ROUTES_API_KEY or request routingService \"osrm\"".to_string(),
        }),
    }
}

pub async fn get_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let service = RoutingService::parse(request.routing_service.as_deref())?;
    let (origin, destination) = endpoints(request.origin, request.destination)?;
    let provider = provider_for(&state, service)?;

    tracing::info!(
        "Route requested from {:?} to {:?} via {}",
        origin,
        destination,
        service.as_str()
    );
    let (from, to) = geocode_pair(&state, &origin, &destination).await?;

    let segment = route(provider, from, to).await.map_err(|err| {
        tracing::error!("Routing via {} failed: {}", provider.name(), err);
        ApiError::upstream("Failed to fetch route", err)
    })?;

    Ok(Json(json!({
        "success": true,
        "route": RouteView::from(&segment),
        "origin": Endpoint { address: &origin, coordinates: from },
        "destination": Endpoint { address: &destination, coordinates: to },
        "routingService": service.as_str(),
        "timestamp": timestamp(),
    })))
}

pub async fn get_alternatives(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AlternativesRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let (origin, destination) = endpoints(request.origin, request.destination)?;
    let alternatives = request.alternatives.unwrap_or(DEFAULT_ALTERNATIVES);

    let (from, to) = geocode_pair(&state, &origin, &destination).await?;
    let routes = route_alternatives(state.router(), from, to, alternatives)
        .await
        .map_err(|err| {
            tracing::error!("Alternative routes failed: {}", err);
            ApiError::upstream("Failed to fetch alternative routes", err)
        })?;

    Ok(Json(json!({
        "success": true,
        "routes": routes.iter().map(RankedRouteView::from).collect::<Vec<_>>(),
        "origin": Endpoint { address: &origin, coordinates: from },
        "destination": Endpoint { address: &destination, coordinates: to },
        "timestamp": timestamp(),
    })))
}

pub async fn optimize_waypoints(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WaypointsRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let waypoints = waypoint_names(request)?;
    tracing::info!("Optimizing {} waypoints", waypoints.len());

    let optimized = optimize_waypoint_order(&state.geocoder(), state.trips(), &waypoints)
        .await
        .map_err(|err| {
            tracing::error!("Waypoint optimization failed: {}", err);
            ApiError::upstream("Failed to optimize waypoints", err)
        })?;

    let itinerary = &optimized.itinerary;
    tracing::info!("Optimized order {:?}", optimized.optimized_order);
    Ok(Json(json!({
        "success": true,
        "optimizedOrder": optimized.optimized_order,
        "optimizedRoute": {
            "waypointOrder": optimized.optimized_order,
            "waypoints": itinerary.ordered_waypoints,
            "waypointCoordinates": itinerary.waypoint_coordinates,
            "distance": itinerary.total_distance_meters,
            "duration": itinerary.total_duration_minutes,
            "geometry": LineString::new(&itinerary.merged_geometry),
            "steps": itinerary.merged_steps,
        },
        "timestamp": timestamp(),
    })))
}

pub async fn multi_stop(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WaypointsRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let waypoints = waypoint_names(request)?;
    tracing::info!("Calculating multi-stop route through {} waypoints", waypoints.len());

    let itinerary = compute_multi_stop_route(&state.geocoder(), state.router(), &waypoints)
        .await
        .map_err(|err| {
            tracing::error!("Multi-stop route failed: {}", err);
            ApiError::upstream("Failed to calculate multi-stop route", err)
        })?;

    let first = itinerary.waypoint_coordinates[0];
    let last = itinerary.waypoint_coordinates[itinerary.waypoint_coordinates.len() - 1];
    Ok(Json(json!({
        "success": true,
        "route": ItineraryRouteView::from(&itinerary),
        "origin": Endpoint { address: &waypoints[0], coordinates: first },
        "destination": Endpoint { address: &waypoints[waypoints.len() - 1], coordinates: last },
        "waypoints": itinerary.ordered_waypoints,
        "waypointCoordinates": itinerary.waypoint_coordinates,
        "routingService": "osrm",
        "timestamp": timestamp(),
    })))
}
