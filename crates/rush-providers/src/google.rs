//! Google Routes API (`directions/v2:computeRoutes`) client.

use futures::future::BoxFuture;
use reqwest::Client;
use rush_core::{Coordinate, ProviderError, ProviderRoute, RouteProvider};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::http::{send_json, trim_base};

pub const DEFAULT_BASE_URL: &str = "https://routes.googleapis.com";
const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline";
const POLYLINE_PRECISION: u32 = 5;

/// Traffic-aware driving routes. Google returns no step annotations for
/// the requested field mask, so routes carry geometry but no legs.
#[derive(Debug, Clone)]
pub struct GoogleRoutesClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<GoogleRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleRoute {
    #[serde(default)]
    distance_meters: Option<f64>,
    /// Protobuf duration, e.g. `"1234s"`.
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedPolyline {
    encoded_polyline: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

/// Seconds from a protobuf duration string such as `"754s"` or `"12.5s"`.
pub fn parse_duration_seconds(value: &str) -> Option<f64> {
    value
        .trim()
        .strip_suffix('s')
        .and_then(|seconds| seconds.parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
}

/// Decode an encoded polyline into coordinates.
pub fn decode_geometry(encoded: &str) -> Result<Vec<Coordinate>, ProviderError> {
    let line = polyline::decode_polyline(encoded, POLYLINE_PRECISION)
        .map_err(|err| ProviderError::Decode(format!("invalid polyline: {}", err)))?;
    Ok(line
        .0
        .into_iter()
        .map(|point| Coordinate::new(point.y, point.x))
        .collect())
}

fn waypoint(coordinate: Coordinate) -> serde_json::Value {
    json!({
        "location": {
            "latLng": LatLng {
                latitude: coordinate.lat,
                longitude: coordinate.lon,
            }
        }
    })
}

impl GoogleRoute {
    fn into_provider(self) -> Result<ProviderRoute, ProviderError> {
        let geometry = match &self.polyline {
            Some(polyline) => decode_geometry(&polyline.encoded_polyline)?,
            None => Vec::new(),
        };
        Ok(ProviderRoute {
            distance_m: self.distance_meters.unwrap_or_default(),
            duration_s: self
                .duration
                .as_deref()
                .and_then(parse_duration_seconds)
                .unwrap_or_default(),
            geometry,
            legs: Vec::new(),
        })
    }
}

impl GoogleRoutesClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key: api_key.into(),
            timeout,
        }
    }

    async fn compute_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        let url = format!("{}/directions/v2:computeRoutes", self.base_url);
        let body = json!({
            "origin": waypoint(origin),
            "destination": waypoint(destination),
            "travelMode": "DRIVE",
            "routingPreference": "TRAFFIC_AWARE",
            "computeAlternativeRoutes": alternatives > 0,
            "units": "METRIC",
        });

        let request = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .timeout(self.timeout);

        let payload: ComputeRoutesResponse = send_json(request).await?;
        tracing::debug!("Google returned {} route(s)", payload.routes.len());
        payload
            .routes
            .into_iter()
            .map(GoogleRoute::into_provider)
            .collect()
    }
}

impl RouteProvider for GoogleRoutesClient {
    fn name(&self) -> &'static str {
        "google"
    }

    fn routes<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> BoxFuture<'a, Result<Vec<ProviderRoute>, ProviderError>> {
        Box::pin(self.compute_routes(origin, destination, alternatives))
    }
}
