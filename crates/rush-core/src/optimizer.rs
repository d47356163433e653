//! Waypoint order optimization through a trip service.

use crate::error::OptimizationFailure;
use crate::geocoder::Geocoder;
use crate::itinerary::geocode_in_order;
use crate::models::{Itinerary, ItineraryLeg, OptimizedItinerary};
use crate::provider::TripProvider;
use crate::router::{normalize_leg, normalize_route};

/// Invert the provider's per-stop trip positions into a visiting order.
///
/// Returns `None` unless `waypoint_index` is a permutation of `0..count`.
pub fn visiting_order(waypoint_index: &[usize], count: usize) -> Option<Vec<usize>> {
    if waypoint_index.len() != count {
        return None;
    }
    let mut order: Vec<Option<usize>> = vec![None; count];
    for (input, &position) in waypoint_index.iter().enumerate() {
        let slot = order.get_mut(position)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(input);
    }
    order.into_iter().collect()
}

/// Geocode `waypoints` in order, then let the trip provider choose the
/// visiting order. Distance, duration and geometry are the provider's trip
/// figures; they are not recomputed from individual legs.
pub async fn optimize_waypoint_order(
    geocoder: &Geocoder,
    provider: &dyn TripProvider,
    waypoints: &[String],
) -> Result<OptimizedItinerary, OptimizationFailure> {
    if waypoints.len() < 2 {
        return Err(OptimizationFailure::TooFewWaypoints);
    }

    let coordinates = geocode_in_order(geocoder, waypoints).await?;
    let trip = provider
        .trip(&coordinates)
        .await?
        .ok_or(OptimizationFailure::NoTrip)?;

    let order = visiting_order(&trip.waypoint_index, waypoints.len()).ok_or_else(|| {
        OptimizationFailure::InvalidTrip(format!(
            "waypoint order {:?} is not a permutation of {} stops",
            trip.waypoint_index,
            waypoints.len()
        ))
    })?;
    if trip.route.legs.len() != waypoints.len() - 1 {
        return Err(OptimizationFailure::InvalidTrip(format!(
            "expected {} legs, got {}",
            waypoints.len() - 1,
            trip.route.legs.len()
        )));
    }

    let ordered_waypoints: Vec<String> = order.iter().map(|&i| waypoints[i].clone()).collect();
    let waypoint_coordinates = order.iter().map(|&i| coordinates[i]).collect();
    let segments: Vec<ItineraryLeg> = ordered_waypoints
        .windows(2)
        .zip(&trip.route.legs)
        .map(|(names, leg)| ItineraryLeg {
            from: names[0].clone(),
            to: names[1].clone(),
            segment: normalize_leg(leg),
        })
        .collect();
    let summary = normalize_route(&trip.route);

    tracing::info!("Waypoint optimization successful. Order: {:?}", order);
    Ok(OptimizedItinerary {
        optimized_order: order,
        itinerary: Itinerary {
            ordered_waypoints,
            waypoint_coordinates,
            segments,
            total_distance_meters: summary.distance_meters,
            total_duration_minutes: summary.duration_minutes,
            merged_geometry: summary.geometry,
            merged_steps: summary.steps,
        },
    })
}
