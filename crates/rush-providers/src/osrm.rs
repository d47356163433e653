//! OSRM route and trip service client.

use futures::future::BoxFuture;
use reqwest::Client;
use rush_core::{
    Coordinate, ProviderError, ProviderLeg, ProviderRoute, ProviderStep, ProviderTrip,
    RouteProvider, TripProvider,
};
use serde::Deserialize;
use std::time::Duration;

use crate::http::{send, transport_error, trim_base};

pub const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_PROFILE: &str = "driving";

/// Response codes meaning "nothing found" rather than a failed request.
const EMPTY_RESULT_CODES: &[&str] = &["NoRoute", "NoSegment", "NoTrips"];

#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    profile: String,
    route_timeout: Duration,
    trip_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmTripResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    trips: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmTripWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmTripWaypoint {
    waypoint_index: usize,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<GeoJsonLine>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: Option<String>,
    maneuver: OsrmManeuver,
    #[serde(default)]
    geometry: Option<GeoJsonLine>,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    maneuver_type: String,
    #[serde(default)]
    modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

impl GeoJsonLine {
    fn to_coordinates(&self) -> Vec<Coordinate> {
        self.coordinates
            .iter()
            .map(|[lon, lat]| Coordinate::new(*lat, *lon))
            .collect()
    }
}

fn line(geometry: &Option<GeoJsonLine>) -> Vec<Coordinate> {
    geometry.as_ref().map(GeoJsonLine::to_coordinates).unwrap_or_default()
}

impl OsrmLeg {
    fn into_provider(self) -> ProviderLeg {
        let mut geometry: Vec<Coordinate> = Vec::new();
        for step in &self.steps {
            for point in line(&step.geometry) {
                if geometry.last() != Some(&point) {
                    geometry.push(point);
                }
            }
        }
        ProviderLeg {
            distance_m: self.distance,
            duration_s: self.duration,
            geometry,
            steps: self
                .steps
                .into_iter()
                .map(|step| ProviderStep {
                    maneuver_type: step.maneuver.maneuver_type,
                    modifier: step.maneuver.modifier,
                    distance_m: step.distance,
                    duration_s: step.duration,
                    name: step.name,
                })
                .collect(),
        }
    }
}

impl OsrmRoute {
    fn into_provider(self) -> ProviderRoute {
        ProviderRoute {
            distance_m: self.distance,
            duration_s: self.duration,
            geometry: line(&self.geometry),
            legs: self.legs.into_iter().map(OsrmLeg::into_provider).collect(),
        }
    }
}

/// `lon,lat;lon,lat;...` as OSRM expects in the URL path.
pub fn coordinate_path(stops: &[Coordinate]) -> String {
    stops
        .iter()
        .map(|c| format!("{},{}", c.lon, c.lat))
        .collect::<Vec<_>>()
        .join(";")
}

impl OsrmClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        route_timeout: Duration,
        trip_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            profile: DEFAULT_PROFILE.to_string(),
            route_timeout,
            trip_timeout,
        }
    }

    /// Routing profile segment of service URLs (`driving`, `foot`, ...).
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// GET a service URL and decode the body. OSRM reports "no route" as a
    /// 400 with a JSON `code`, so the body is decoded before the status is
    /// judged.
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<(u16, Result<T, String>), ProviderError> {
        let response = send(self.client.get(&url).query(query).timeout(timeout)).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        let decoded = match serde_json::from_str::<T>(&body) {
            Ok(payload) => Ok(payload),
            Err(_) => Err(body),
        };
        Ok((status, decoded))
    }

    async fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        let url = format!(
            "{}/route/v1/{}/{}",
            self.base_url,
            self.profile,
            coordinate_path(&[origin, destination])
        );
        let mut query = vec![
            ("overview", "full".to_string()),
            ("geometries", "geojson".to_string()),
            ("steps", "true".to_string()),
        ];
        if alternatives > 0 {
            query.push(("alternatives", alternatives.to_string()));
        }

        let (status, decoded) = self
            .fetch::<OsrmRouteResponse>(url, &query, self.route_timeout)
            .await?;
        let Some(payload) = check(status, decoded)? else {
            return Ok(Vec::new());
        };

        tracing::debug!("OSRM returned {} route(s)", payload.routes.len());
        Ok(payload
            .routes
            .into_iter()
            .map(OsrmRoute::into_provider)
            .collect())
    }

    async fn fetch_trip(
        &self,
        stops: &[Coordinate],
    ) -> Result<Option<ProviderTrip>, ProviderError> {
        let url = format!(
            "{}/trip/v1/{}/{}",
            self.base_url,
            self.profile,
            coordinate_path(stops)
        );
        let query = [
            ("overview", "full".to_string()),
            ("geometries", "geojson".to_string()),
            ("steps", "true".to_string()),
            ("roundtrip", "false".to_string()),
            ("source", "first".to_string()),
            ("destination", "any".to_string()),
        ];

        let (status, decoded) = self
            .fetch::<OsrmTripResponse>(url, &query, self.trip_timeout)
            .await?;
        let Some(mut payload) = check(status, decoded)? else {
            return Ok(None);
        };
        if payload.trips.is_empty() {
            return Ok(None);
        }

        let trip = payload.trips.swap_remove(0);
        Ok(Some(ProviderTrip {
            route: trip.into_provider(),
            waypoint_index: payload
                .waypoints
                .iter()
                .map(|waypoint| waypoint.waypoint_index)
                .collect(),
        }))
    }
}

/// Common envelope of OSRM service responses.
trait OsrmEnvelope {
    fn code(&self) -> &str;
    fn message(&self) -> Option<&str>;
}

impl OsrmEnvelope for OsrmRouteResponse {
    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl OsrmEnvelope for OsrmTripResponse {
    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Sort a decoded OSRM response into success, empty result or error.
fn check<T: OsrmEnvelope>(
    status: u16,
    decoded: Result<T, String>,
) -> Result<Option<T>, ProviderError> {
    let payload = match decoded {
        Ok(payload) => payload,
        Err(body) if (200..300).contains(&status) => {
            return Err(ProviderError::Decode(format!("unexpected OSRM body: {}", body)));
        }
        Err(body) => return Err(ProviderError::Status { status, body }),
    };

    let code = payload.code().to_string();
    let message = payload.message().unwrap_or_default().to_string();
    if code == "Ok" {
        return Ok(Some(payload));
    }
    if EMPTY_RESULT_CODES.contains(&code.as_str()) {
        tracing::warn!("OSRM found nothing: {} {}", code, message);
        return Ok(None);
    }
    Err(ProviderError::Status {
        status,
        body: format!("{}: {}", code, message),
    })
}

impl RouteProvider for OsrmClient {
    fn name(&self) -> &'static str {
        "osrm"
    }

    fn routes<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> BoxFuture<'a, Result<Vec<ProviderRoute>, ProviderError>> {
        Box::pin(self.fetch_routes(origin, destination, alternatives))
    }
}

impl TripProvider for OsrmClient {
    fn trip<'a>(
        &'a self,
        stops: &'a [Coordinate],
    ) -> BoxFuture<'a, Result<Option<ProviderTrip>, ProviderError>> {
        Box::pin(self.fetch_trip(stops))
    }
}
