//! Wire shapes for route responses. Geometry is GeoJSON, `[lon, lat]`.

use rush_core::{Coordinate, Itinerary, ItineraryLeg, RankedRoute, RouteSegment, RouteStep};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LineString {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn new(points: &[Coordinate]) -> Self {
        Self {
            kind: "LineString",
            coordinates: points.iter().map(|p| p.to_lon_lat()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteView<'a> {
    pub distance: u64,
    pub duration: u64,
    pub geometry: LineString,
    pub steps: &'a [RouteStep],
}

impl<'a> From<&'a RouteSegment> for RouteView<'a> {
    fn from(segment: &'a RouteSegment) -> Self {
        Self {
            distance: segment.distance_meters,
            duration: segment.duration_minutes,
            geometry: LineString::new(&segment.geometry),
            steps: &segment.steps,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRouteView<'a> {
    pub route_index: usize,
    #[serde(flatten)]
    pub route: RouteView<'a>,
}

impl<'a> From<&'a RankedRoute> for RankedRouteView<'a> {
    fn from(ranked: &'a RankedRoute) -> Self {
        Self {
            route_index: ranked.route_index,
            route: RouteView::from(&ranked.segment),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LegView<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub distance: u64,
    pub duration: u64,
    pub geometry: LineString,
}

impl<'a> From<&'a ItineraryLeg> for LegView<'a> {
    fn from(leg: &'a ItineraryLeg) -> Self {
        Self {
            from: &leg.from,
            to: &leg.to,
            distance: leg.segment.distance_meters,
            duration: leg.segment.duration_minutes,
            geometry: LineString::new(&leg.segment.geometry),
        }
    }
}

/// Totals, merged path and per-leg breakdown of an itinerary.
#[derive(Debug, Serialize)]
pub struct ItineraryRouteView<'a> {
    pub distance: u64,
    pub duration: u64,
    pub geometry: LineString,
    pub steps: &'a [RouteStep],
    pub segments: Vec<LegView<'a>>,
}

impl<'a> From<&'a Itinerary> for ItineraryRouteView<'a> {
    fn from(itinerary: &'a Itinerary) -> Self {
        Self {
            distance: itinerary.total_distance_meters,
            duration: itinerary.total_duration_minutes,
            geometry: LineString::new(&itinerary.merged_geometry),
            steps: &itinerary.merged_steps,
            segments: itinerary.segments.iter().map(LegView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Endpoint<'a> {
    pub address: &'a str,
    pub coordinates: Coordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_is_lon_lat() {
        let line = serde_json::to_value(LineString::new(&[Coordinate::new(12.97, 77.64)])).unwrap();
        assert_eq!(line["type"], "LineString");
        assert_eq!(line["coordinates"][0][0], 77.64);
        assert_eq!(line["coordinates"][0][1], 12.97);
    }
}
