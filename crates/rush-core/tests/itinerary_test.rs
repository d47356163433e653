//! Multi-stop aggregation and waypoint optimization against in-memory providers.

mod common;

use common::{straight_route, CannedTrip, Gazetteer, PairRouter};
use rush_core::{
    compute_multi_stop_route, optimize_waypoint_order, AggregationFailure, Coordinate,
    GeocodePolicy, Geocoder, OptimizationFailure, ProviderRoute, ProviderTrip,
    RequestSpacer, RoutingFailure,
};
use std::sync::Arc;
use std::time::Duration;

const A: Coordinate = Coordinate { lat: 12.97, lon: 77.64 };
const B: Coordinate = Coordinate { lat: 12.93, lon: 77.62 };
const C: Coordinate = Coordinate { lat: 12.97, lon: 77.75 };

fn gazetteer() -> Gazetteer {
    Gazetteer::default()
        .with("Indiranagar", A.lat, A.lon)
        .with("Koramangala", B.lat, B.lon)
        .with("Whitefield", C.lat, C.lon)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn geocoder(provider: Arc<Gazetteer>, retry_delay: Duration) -> Geocoder {
    let policy = GeocodePolicy::default().with_retries(3, retry_delay);
    Geocoder::new(provider, policy, RequestSpacer::unlimited())
}

fn spaced_geocoder(provider: Arc<Gazetteer>, interval: Duration) -> Geocoder {
    let policy = GeocodePolicy::default().with_retries(3, Duration::ZERO);
    Geocoder::new(provider, policy, RequestSpacer::new(interval))
}

#[tokio::test(start_paused = true)]
async fn stitches_legs_in_given_order() {
    let places = Arc::new(gazetteer());
    let router = PairRouter::default()
        .with(A, B, 1000.0, 300.0)
        .with(B, C, 2500.0, 600.0);

    let itinerary = compute_multi_stop_route(
        &geocoder(places.clone(), Duration::from_secs(1)),
        &router,
        &names(&["Indiranagar", "Koramangala", "Whitefield"]),
    )
    .await
    .unwrap();

    assert_eq!(itinerary.segments.len(), 2);
    assert_eq!(itinerary.total_distance_meters, 3500);
    assert_eq!(itinerary.total_duration_minutes, 15);
    assert_eq!(itinerary.waypoint_coordinates, vec![A, B, C]);
    assert_eq!(itinerary.merged_geometry, vec![A, B, B, C]);
    assert_eq!(itinerary.merged_steps.len(), 4);
    assert_eq!(itinerary.segments[0].from, "Indiranagar");
    assert_eq!(itinerary.segments[1].to, "Whitefield");
    assert_eq!(router.calls(), vec![(A, B), (B, C)]);
}

#[tokio::test]
async fn geocode_calls_are_spaced_across_waypoints() {
    let interval = Duration::from_millis(60);
    let places = Arc::new(gazetteer());
    let router = PairRouter::default()
        .with(A, B, 1000.0, 300.0)
        .with(B, C, 2500.0, 600.0);

    compute_multi_stop_route(
        &spaced_geocoder(places.clone(), interval),
        &router,
        &names(&["Indiranagar", "Koramangala", "Whitefield"]),
    )
    .await
    .unwrap();

    let times = places.call_times();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= interval - Duration::from_millis(10));
    }
}

#[tokio::test(start_paused = true)]
async fn failed_geocode_aborts_before_any_routing() {
    let places = Arc::new(
        Gazetteer::default()
            .with("Indiranagar", A.lat, A.lon)
            .with("Whitefield", C.lat, C.lon),
    );
    let router = PairRouter::default()
        .with(A, B, 1000.0, 300.0)
        .with(B, C, 2500.0, 600.0);

    let failure = compute_multi_stop_route(
        &geocoder(places.clone(), Duration::from_secs(1)),
        &router,
        &names(&["Indiranagar", "Atlantis", "Whitefield"]),
    )
    .await
    .unwrap_err();

    assert!(matches!(failure, AggregationFailure::Geocode(_)));
    assert_eq!(failure.waypoint(), Some("Atlantis"));
    assert!(router.calls().is_empty());
    assert!(!places.queries().iter().any(|q| q == "Whitefield"));
}

#[tokio::test]
async fn routing_failure_names_the_leg() {
    let places = Arc::new(gazetteer());
    let router = PairRouter::default().with(A, B, 1000.0, 300.0);

    let failure = compute_multi_stop_route(
        &geocoder(places, Duration::ZERO),
        &router,
        &names(&["Indiranagar", "Koramangala", "Whitefield"]),
    )
    .await
    .unwrap_err();

    match failure {
        AggregationFailure::Routing { from, to, source } => {
            assert_eq!(from, "Koramangala");
            assert_eq!(to, "Whitefield");
            assert!(matches!(source, RoutingFailure::NoRoute));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[tokio::test]
async fn single_waypoint_is_rejected() {
    let places = Arc::new(gazetteer());
    let failure = compute_multi_stop_route(
        &geocoder(places.clone(), Duration::ZERO),
        &PairRouter::default(),
        &names(&["Indiranagar"]),
    )
    .await
    .unwrap_err();

    assert!(matches!(failure, AggregationFailure::TooFewWaypoints));
    assert!(places.queries().is_empty());
}

fn trip_visiting_a_c_b() -> ProviderTrip {
    let first = straight_route(A, C, 9000.0, 1200.0);
    let second = straight_route(C, B, 11000.0, 1500.0);
    ProviderTrip {
        route: ProviderRoute {
            distance_m: 20000.4,
            duration_s: 2700.0,
            geometry: vec![A, C, B],
            legs: vec![first.legs[0].clone(), second.legs[0].clone()],
        },
        // input 0 -> first, input 1 -> last, input 2 -> second
        waypoint_index: vec![0, 2, 1],
    }
}

#[tokio::test]
async fn optimizer_reorders_names_and_uses_trip_totals() {
    let places = Arc::new(gazetteer());
    let trips = CannedTrip(Some(trip_visiting_a_c_b()));

    let optimized = optimize_waypoint_order(
        &geocoder(places, Duration::ZERO),
        &trips,
        &names(&["Indiranagar", "Koramangala", "Whitefield"]),
    )
    .await
    .unwrap();

    assert_eq!(optimized.optimized_order, vec![0, 2, 1]);
    let itinerary = optimized.itinerary;
    assert_eq!(
        itinerary.ordered_waypoints,
        names(&["Indiranagar", "Whitefield", "Koramangala"])
    );
    assert_eq!(itinerary.waypoint_coordinates, vec![A, C, B]);
    assert_eq!(itinerary.total_distance_meters, 20000);
    assert_eq!(itinerary.total_duration_minutes, 45);
    assert_eq!(itinerary.merged_geometry, vec![A, C, B]);
    assert_eq!(itinerary.segments.len(), 2);
    assert_eq!(itinerary.segments[0].to, "Whitefield");
    assert_eq!(itinerary.segments[1].segment.distance_meters, 11000);
}

#[tokio::test]
async fn optimizer_fails_without_a_trip() {
    let places = Arc::new(gazetteer());
    let failure = optimize_waypoint_order(
        &geocoder(places, Duration::ZERO),
        &CannedTrip(None),
        &names(&["Indiranagar", "Koramangala"]),
    )
    .await
    .unwrap_err();

    assert!(matches!(failure, OptimizationFailure::NoTrip));
}

#[tokio::test]
async fn optimizer_rejects_a_broken_permutation() {
    let places = Arc::new(gazetteer());
    let mut trip = trip_visiting_a_c_b();
    trip.waypoint_index = vec![0, 1, 1];

    let failure = optimize_waypoint_order(
        &geocoder(places, Duration::ZERO),
        &CannedTrip(Some(trip)),
        &names(&["Indiranagar", "Koramangala", "Whitefield"]),
    )
    .await
    .unwrap_err();

    assert!(matches!(failure, OptimizationFailure::InvalidTrip(_)));
}
