//! Provider clients against local HTTP fixtures.

use reqwest::Client;
use rush_core::{Coordinate, GeocodeProvider, ProviderError, RouteProvider, TripProvider};
use rush_providers::{GoogleRoutesClient, NominatimClient, OsrmClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn osrm(server: &MockServer) -> OsrmClient {
    OsrmClient::new(Client::new(), server.uri(), TIMEOUT, TIMEOUT)
}

#[tokio::test]
async fn nominatim_parses_string_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Hebbal, Bangalore, India"))
        .and(query_param("format", "json"))
        .and(header("user-agent", "SmartCityRushHour/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "13.0358", "lon": "77.5970", "display_name": "Hebbal" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        NominatimClient::new(Client::new(), server.uri(), "SmartCityRushHour/1.0", TIMEOUT);
    let results = client.search("Hebbal, Bangalore, India").await.unwrap();

    assert_eq!(results, vec![Coordinate::new(13.0358, 77.5970)]);
}

#[tokio::test]
async fn nominatim_empty_array_is_no_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = NominatimClient::new(Client::new(), server.uri(), "test", TIMEOUT);
    assert!(client.search("Atlantis").await.unwrap().is_empty());
}

#[tokio::test]
async fn nominatim_rate_limit_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = NominatimClient::new(Client::new(), server.uri(), "test", TIMEOUT);
    let err = client.search("Hebbal").await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 429, .. }));
}

fn osrm_route(distance: f64, duration: f64) -> serde_json::Value {
    json!({
        "distance": distance,
        "duration": duration,
        "geometry": { "type": "LineString", "coordinates": [[77.64, 12.97], [77.62, 12.93]] },
        "legs": [{
            "distance": distance,
            "duration": duration,
            "steps": [
                {
                    "distance": distance, "duration": duration, "name": "Old Airport Road",
                    "maneuver": { "type": "depart" },
                    "geometry": { "coordinates": [[77.64, 12.97], [77.62, 12.93]] }
                },
                {
                    "distance": 0.0, "duration": 0.0, "name": "",
                    "maneuver": { "type": "arrive", "modifier": "right" },
                    "geometry": { "coordinates": [[77.62, 12.93]] }
                }
            ]
        }]
    })
}

#[tokio::test]
async fn osrm_route_maps_lon_lat_geometry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("steps", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [osrm_route(5321.7, 845.0)]
        })))
        .mount(&server)
        .await;

    let routes = osrm(&server)
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62), 0)
        .await
        .unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].geometry[0], Coordinate::new(12.97, 77.64));
    assert_eq!(routes[0].legs[0].steps[0].maneuver_type, "depart");
    assert_eq!(routes[0].legs[0].steps[1].modifier.as_deref(), Some("right"));
    assert_eq!(routes[0].legs[0].geometry.len(), 2);
}

#[tokio::test]
async fn osrm_uses_the_configured_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/foot/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [osrm_route(900.0, 600.0)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let routes = osrm(&server)
        .with_profile("foot")
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.96, 77.64), 0)
        .await
        .unwrap();
    assert_eq!(routes.len(), 1);
}

#[tokio::test]
async fn osrm_requests_alternatives() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .and(query_param("alternatives", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [osrm_route(5000.0, 800.0), osrm_route(6100.0, 900.0)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let routes = osrm(&server)
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62), 3)
        .await
        .unwrap();
    assert_eq!(routes.len(), 2);
}

#[tokio::test]
async fn osrm_no_route_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&server)
        .await;

    let routes = osrm(&server)
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(-33.0, 151.0), 0)
        .await
        .unwrap();
    assert!(routes.is_empty());
}

#[tokio::test]
async fn osrm_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = osrm(&server)
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 502, .. }));
}

#[tokio::test]
async fn osrm_trip_starts_at_first_stop_and_frees_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/trip/v1/driving/.+"))
        .and(query_param("roundtrip", "false"))
        .and(query_param("source", "first"))
        .and(query_param("destination", "any"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "trips": [osrm_route(12000.0, 1800.0)],
            "waypoints": [
                { "waypoint_index": 0, "trips_index": 0 },
                { "waypoint_index": 2, "trips_index": 0 },
                { "waypoint_index": 1, "trips_index": 0 }
            ]
        })))
        .mount(&server)
        .await;

    // The last input stop is visited second; the trip ends at input 1.
    let stops = [
        Coordinate::new(12.97, 77.64),
        Coordinate::new(12.93, 77.62),
        Coordinate::new(12.97, 77.75),
    ];
    let trip = osrm(&server).trip(&stops).await.unwrap().unwrap();
    assert_eq!(trip.waypoint_index, vec![0, 2, 1]);
    assert_eq!(trip.route.distance_m, 12000.0);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("destination=any"), "{query}");
    assert!(!query.contains("destination=last"), "{query}");
}

#[tokio::test]
async fn osrm_no_trips_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/trip/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "code": "NoTrips" })))
        .mount(&server)
        .await;

    let stops = [Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62)];
    assert!(osrm(&server).trip(&stops).await.unwrap().is_none());
}

#[tokio::test]
async fn google_sends_key_and_decodes_polyline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/directions/v2:computeRoutes"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": [{
                "distanceMeters": 7345,
                "duration": "1260s",
                "polyline": { "encodedPolyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleRoutesClient::new(Client::new(), server.uri(), "test-key", TIMEOUT);
    let routes = client
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62), 0)
        .await
        .unwrap();

    assert_eq!(client.name(), "google");
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].distance_m, 7345.0);
    assert_eq!(routes[0].duration_s, 1260.0);
    assert_eq!(routes[0].geometry.len(), 3);
    assert!(routes[0].legs.is_empty());
}

#[tokio::test]
async fn google_without_routes_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/directions/v2:computeRoutes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = GoogleRoutesClient::new(Client::new(), server.uri(), "test-key", TIMEOUT);
    let routes = client
        .routes(Coordinate::new(12.97, 77.64), Coordinate::new(12.93, 77.62), 0)
        .await
        .unwrap();
    assert!(routes.is_empty());
}
