//! Congestion prediction endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use rush_core::{
    adjusted_duration, estimated_delay, predict_score, route, CongestionPrediction, Coordinate,
    PredictionInput, Severity,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::timestamp;
use crate::state::AppState;

const REQUIRED_FIELDS: [&str; 4] =
    ["areaName", "roadName", "weatherConditions", "roadworkActivity"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub start_location: Option<String>,
    pub area_name: Option<String>,
    pub road_name: Option<String>,
    pub weather_conditions: Option<String>,
    pub roadwork_activity: Option<String>,
    pub prediction_date: Option<String>,
    pub origin_coords: Option<Coordinate>,
    pub dest_coords: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub locations: Option<Value>,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl PredictRequest {
    /// Model input, or `None` when a required field is missing or blank.
    pub fn input(&self) -> Option<PredictionInput> {
        Some(PredictionInput {
            area: present(&self.area_name)?,
            road: present(&self.road_name)?,
            weather: present(&self.weather_conditions)?,
            roadwork: present(&self.roadwork_activity)?,
            date: present(&self.prediction_date),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    pub base_duration: u64,
    pub adjusted_duration: u64,
    pub delay_minutes: u64,
    pub distance: u64,
}

impl TimeInfo {
    pub fn new(base_minutes: u64, distance_meters: u64, score: u8) -> Self {
        let adjusted = adjusted_duration(base_minutes, score);
        Self {
            base_duration: base_minutes,
            adjusted_duration: adjusted,
            delay_minutes: adjusted.saturating_sub(base_minutes),
            distance: distance_meters,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationEcho<'a> {
    start_location: Option<&'a str>,
    area: &'a str,
    road: &'a str,
    weather: &'a str,
    roadwork: &'a str,
    prediction_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictionView<'a> {
    #[serde(flatten)]
    congestion: CongestionPrediction,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_info: Option<TimeInfo>,
    location: LocationEcho<'a>,
}

/// Base travel time between two points, if the router can provide one.
async fn base_trip(
    state: &AppState,
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> Option<(u64, u64)> {
    let (origin, destination) = (origin?, destination?);
    if !origin.is_valid() || !destination.is_valid() {
        tracing::warn!("Ignoring invalid route coordinates for prediction");
        return None;
    }
    match route(state.router(), origin, destination).await {
        Ok(segment) => Some((segment.duration_minutes.max(1), segment.distance_meters)),
        Err(err) => {
            tracing::warn!("Could not fetch route info: {}", err);
            None
        }
    }
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let input = request.input().ok_or_else(|| {
        ApiError::bad_request_with("Missing required fields", "required", json!(REQUIRED_FIELDS))
    })?;
    tracing::info!("Prediction requested for {} / {}", input.area, input.road);

    let (trip, score) = tokio::join!(
        base_trip(&state, request.origin_coords, request.dest_coords),
        predict_score(state.predictor(), &input)
    );
    let score = score?;

    let start = present(&request.start_location);
    let view = PredictionView {
        congestion: CongestionPrediction::from_score(
            score,
            start.as_deref(),
            Some(input.area.as_str()),
        ),
        timestamp: timestamp(),
        time_info: trip.map(|(base, distance)| TimeInfo::new(base, distance, score)),
        location: LocationEcho {
            start_location: start.as_deref(),
            area: &input.area,
            road: &input.road,
            weather: &input.weather,
            roadwork: &input.roadwork,
            prediction_date: input
                .date
                .clone()
                .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string()),
        },
    };

    Ok(Json(json!({ "success": true, "prediction": view })))
}

/// Predictions for many locations. One item failing never fails the batch.
pub async fn predict_bulk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BulkRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let Some(Value::Array(locations)) = request.locations else {
        return Err(ApiError::bad_request("Invalid input. Expected array of locations."));
    };

    let mut predictions = Vec::with_capacity(locations.len());
    for location in locations {
        let input = serde_json::from_value::<PredictRequest>(location.clone())
            .ok()
            .and_then(|item| item.input());
        let Some(input) = input else {
            predictions.push(json!({
                "location": location,
                "error": "Prediction failed",
                "message": format!("Missing required fields: {}", REQUIRED_FIELDS.join(", ")),
            }));
            continue;
        };

        match predict_score(state.predictor(), &input).await {
            Ok(score) => predictions.push(json!({
                "location": location,
                "congestionLevel": score,
                "severity": Severity::from_score(score),
                "estimatedDelay": estimated_delay(score),
            })),
            Err(err) => {
                tracing::warn!("Bulk prediction failed for {}: {}", input.area, err);
                let details = err.details();
                predictions.push(json!({
                    "location": location,
                    "error": "Prediction failed",
                    "message": if details.trim().is_empty() { err.to_string() } else { details },
                }));
            }
        }
    }

    Ok(Json(json!({
        "success": true,
        "predictions": predictions,
        "timestamp": timestamp(),
    })))
}
