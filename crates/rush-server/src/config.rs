//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rush_providers::{google, nominatim, osrm};

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,

    pub osrm_url: String,
    pub osrm_profile: String,
    pub nominatim_url: String,
    pub google_routes_url: String,
    pub google_routes_api_key: Option<String>,

    pub geocode_user_agent: String,
    pub geocode_city: Option<String>,
    pub geocode_country: Option<String>,
    pub geocode_max_attempts: u32,
    pub geocode_retry_delay: Duration,
    pub geocode_min_interval: Duration,

    pub python_path: String,
    pub predict_script: Option<String>,

    pub provider_timeout: Duration,
    pub multi_waypoint_timeout: Duration,
    pub predict_timeout: Duration,

    pub rate_limit_enabled: bool,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
    pub rate_limit_max_tracked_ips: usize,
    pub trust_proxy: bool,

    pub cors_origins: Vec<String>,
    pub request_size_limit_bytes: usize,
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// Unset and blank both mean "not configured".
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn text_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

/// `default` when the key is unset; an explicit empty value turns the
/// setting off.
fn optional_or(key: &str, default: &str) -> Option<String> {
    set_or_default(env::var(key).ok(), default)
}

fn set_or_default(value: Option<String>, default: &str) -> Option<String> {
    match value {
        Some(value) => Some(value.trim().to_string()).filter(|s| !s.is_empty()),
        None => Some(default.to_string()),
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: parse_or("PORT", 5000),

            osrm_url: text_or("OSRM_URL", osrm::DEFAULT_BASE_URL),
            osrm_profile: text_or("OSRM_PROFILE", osrm::DEFAULT_PROFILE),
            nominatim_url: text_or("NOMINATIM_URL", nominatim::DEFAULT_BASE_URL),
            google_routes_url: text_or("GOOGLE_ROUTES_URL", google::DEFAULT_BASE_URL),
            google_routes_api_key: optional("GOOGLE_ROUTES_API_KEY"),

            geocode_user_agent: text_or("GEOCODE_USER_AGENT", "SmartCityRushHour/1.0"),
            geocode_city: optional_or("GEOCODE_CITY", "Bangalore"),
            geocode_country: optional_or("GEOCODE_COUNTRY", "India"),
            geocode_max_attempts: parse_or("GEOCODE_MAX_ATTEMPTS", 3),
            geocode_retry_delay: Duration::from_millis(parse_or("GEOCODE_RETRY_DELAY_MS", 1000)),
            geocode_min_interval: Duration::from_millis(parse_or("GEOCODE_MIN_INTERVAL_MS", 1000)),

            python_path: text_or("PYTHON_PATH", "python"),
            predict_script: optional_or("PREDICT_SCRIPT", "predict.py"),

            provider_timeout: Duration::from_secs(parse_or("PROVIDER_TIMEOUT_S", 15)),
            multi_waypoint_timeout: Duration::from_secs(parse_or("MULTI_WAYPOINT_TIMEOUT_S", 30)),
            predict_timeout: Duration::from_secs(parse_or("PREDICT_TIMEOUT_S", 30)),

            rate_limit_enabled: flag("RATE_LIMIT_ENABLED", true),
            rate_limit_window: Duration::from_millis(parse_or("RATE_LIMIT_WINDOW_MS", 900_000)),
            rate_limit_max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 100),
            rate_limit_max_tracked_ips: parse_or("RATE_LIMIT_MAX_TRACKED_IPS", 10_000),
            trust_proxy: flag("TRUST_PROXY", false),

            cors_origins: optional("CORS_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()),
            request_size_limit_bytes: parse_or("REQUEST_SIZE_LIMIT_BYTES", 10 * 1024 * 1024),
        }
    }

    /// Whether Google Routes can be used at all.
    pub fn google_enabled(&self) -> bool {
        self.google_routes_api_key.is_some()
    }

    /// Seconds a throttled client is told to wait.
    pub fn retry_after_secs(&self) -> u64 {
        let millis = self.rate_limit_window.as_millis() as u64;
        millis.div_ceil(1000)
    }
}
