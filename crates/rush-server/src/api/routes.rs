//! Router assembly and the small fixed endpoints.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::rate_limit::{self, RateLimiter};
use crate::api::request_id::{ensure_request_id, REQUEST_ID_HEADER};
use crate::api::{directions, predict, timestamp};
use crate::catalog::{AREAS, ROADWORK_OPTIONS, WEATHER_OPTIONS};
use crate::config::Config;
use crate::state::AppState;

/// Every endpoint, rate limited as one pool per client.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let limiter = RateLimiter::from_config(config);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/locations", get(locations))
        .route("/api/predict", post(predict::predict))
        .route("/api/predict/bulk", post(predict::predict_bulk))
        .route("/api/routes", post(directions::get_route))
        .route("/api/routes/alternatives", post(directions::get_alternatives))
        .route("/api/routes/optimize-waypoints", post(directions::optimize_waypoints))
        .route("/api/routes/multi-stop", post(directions::multi_stop))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(limiter, rate_limit::rate_limit))
}

fn cors(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, REQUEST_ID_HEADER]);

    // Credentials cannot be combined with a wildcard origin.
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins)).allow_credentials(true)
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

/// The complete service: routes, state and the shared middleware stack.
pub fn app(state: Arc<AppState>) -> Router {
    let config = state.config.clone();
    create_router(&config).with_state(state).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(ensure_request_id))
            .layer(TraceLayer::new_for_http())
            .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .layer(security_header(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
            .layer(security_header(header::REFERRER_POLICY, "no-referrer"))
            .layer(security_header(header::X_DNS_PREFETCH_CONTROL, "off"))
            .layer(security_header(
                header::STRICT_TRANSPORT_SECURITY,
                "max-age=15552000; includeSubDomains",
            ))
            .layer(security_header(
                HeaderName::from_static("cross-origin-opener-policy"),
                "same-origin",
            ))
            .layer(cors(&config))
            .layer(CompressionLayer::new())
            .layer(DefaultBodyLimit::max(config.request_size_limit_bytes)),
    )
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp(),
        "service": "Traffic Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn locations() -> Json<Value> {
    Json(json!({
        "success": true,
        "locations": AREAS,
        "weatherOptions": WEATHER_OPTIONS,
        "roadworkOptions": ROADWORK_OPTIONS,
    }))
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.to_string(),
            "method": method.as_str(),
        })),
    )
}
