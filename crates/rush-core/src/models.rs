//! Core data models for route planning.

use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// GeoJSON position order (`[lon, lat]`).
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    #[serde(rename = "distance")]
    pub distance_meters: u64,
    #[serde(rename = "duration")]
    pub duration_minutes: u64,
    #[serde(rename = "name")]
    pub road_name: String,
}

/// A normalized route between one origin and one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(rename = "distance")]
    pub distance_meters: u64,
    #[serde(rename = "duration")]
    pub duration_minutes: u64,
    pub geometry: Vec<Coordinate>,
    pub steps: Vec<RouteStep>,
}

/// A route returned among alternatives. `route_index` 0 is the provider's primary route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRoute {
    pub route_index: usize,
    #[serde(flatten)]
    pub segment: RouteSegment,
}

/// One leg of an itinerary, between two consecutive named stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryLeg {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub segment: RouteSegment,
}

/// A stitched multi-stop route.
///
/// `segments.len() == ordered_waypoints.len() - 1` and
/// `waypoint_coordinates` is aligned with `ordered_waypoints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub ordered_waypoints: Vec<String>,
    pub waypoint_coordinates: Vec<Coordinate>,
    pub segments: Vec<ItineraryLeg>,
    pub total_distance_meters: u64,
    pub total_duration_minutes: u64,
    pub merged_geometry: Vec<Coordinate>,
    pub merged_steps: Vec<RouteStep>,
}

/// Result of waypoint optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedItinerary {
    /// `optimized_order[k]` is the input index of the stop visited k-th.
    pub optimized_order: Vec<usize>,
    pub itinerary: Itinerary,
}
