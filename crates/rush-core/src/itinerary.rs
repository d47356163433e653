//! Multi-stop route aggregation.
//!
//! Stops are geocoded one after another through a single [`Geocoder`] (so
//! its request spacer covers the whole run), then routed pair by pair in
//! the given order and stitched into one [`Itinerary`].

use crate::error::{AggregationFailure, GeocodeFailure};
use crate::geocoder::Geocoder;
use crate::models::{Coordinate, Itinerary, ItineraryLeg, RouteSegment};
use crate::provider::RouteProvider;
use crate::router;

/// Accumulates legs into an [`Itinerary`], keeping totals and merged
/// geometry in step with the legs pushed so far.
#[derive(Debug, Clone)]
pub struct ItineraryBuilder {
    itinerary: Itinerary,
}

impl ItineraryBuilder {
    pub fn new(waypoints: Vec<String>, coordinates: Vec<Coordinate>) -> Self {
        Self {
            itinerary: Itinerary {
                ordered_waypoints: waypoints,
                waypoint_coordinates: coordinates,
                segments: Vec::new(),
                total_distance_meters: 0,
                total_duration_minutes: 0,
                merged_geometry: Vec::new(),
                merged_steps: Vec::new(),
            },
        }
    }

    pub fn push_leg(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        segment: RouteSegment,
    ) {
        let itinerary = &mut self.itinerary;
        itinerary.total_distance_meters += segment.distance_meters;
        itinerary.total_duration_minutes += segment.duration_minutes;
        itinerary.merged_geometry.extend_from_slice(&segment.geometry);
        itinerary.merged_steps.extend_from_slice(&segment.steps);
        itinerary.segments.push(ItineraryLeg {
            from: from.into(),
            to: to.into(),
            segment,
        });
    }

    pub fn leg_count(&self) -> usize {
        self.itinerary.segments.len()
    }

    pub fn finish(self) -> Itinerary {
        self.itinerary
    }
}

/// Geocode `names` strictly in order, stopping at the first failure.
pub async fn geocode_in_order(
    geocoder: &Geocoder,
    names: &[String],
) -> Result<Vec<Coordinate>, GeocodeFailure> {
    let mut coordinates = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        tracing::debug!("Geocoding {}/{}: {}", index + 1, names.len(), name);
        coordinates.push(geocoder.geocode(name).await?);
    }
    Ok(coordinates)
}

/// Route through `waypoints` in the order given.
///
/// Either every stop resolves and every leg routes, or the first failure is
/// returned; no partial itinerary is produced.
pub async fn compute_multi_stop_route(
    geocoder: &Geocoder,
    provider: &dyn RouteProvider,
    waypoints: &[String],
) -> Result<Itinerary, AggregationFailure> {
    if waypoints.len() < 2 {
        return Err(AggregationFailure::TooFewWaypoints);
    }

    let coordinates = geocode_in_order(geocoder, waypoints).await?;
    tracing::info!("All {} waypoints geocoded", coordinates.len());

    let mut builder = ItineraryBuilder::new(waypoints.to_vec(), coordinates.clone());
    for (names, points) in waypoints.windows(2).zip(coordinates.windows(2)) {
        let segment = router::route(provider, points[0], points[1])
            .await
            .map_err(|source| AggregationFailure::Routing {
                from: names[0].clone(),
                to: names[1].clone(),
                source,
            })?;
        builder.push_leg(names[0].clone(), names[1].clone(), segment);
    }

    tracing::info!(
        "Multi-stop route calculated with {} legs",
        builder.leg_count()
    );
    Ok(builder.finish())
}
