//! Per-client sliding-window rate limiting.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::Config;

/// Request timestamps per client IP, shared by every clone.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, Vec<Instant>>>,
    last_cleanup: Arc<Mutex<Instant>>,
    cleanup_interval: Duration,
    window: Duration,
    max_requests: u32,
    max_tracked_ips: usize,
    enabled: bool,
    trust_proxy: bool,
    retry_after_secs: u64,
}

impl RateLimiter {
    pub fn new(
        window: Duration,
        max_requests: u32,
        max_tracked_ips: usize,
        enabled: bool,
        trust_proxy: bool,
    ) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            cleanup_interval: Duration::from_secs(60),
            window,
            max_requests,
            max_tracked_ips: max_tracked_ips.max(1),
            enabled,
            trust_proxy,
            retry_after_secs: (window.as_millis() as u64).div_ceil(1000),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rate_limit_window,
            config.rate_limit_max_requests,
            config.rate_limit_max_tracked_ips,
            config.rate_limit_enabled,
            config.trust_proxy,
        )
    }

    /// Record a request from `ip`. Returns false when the client is over its limit.
    pub fn check(&self, ip: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let periodic = {
            let mut last_cleanup = self.last_cleanup.lock().unwrap_or_else(|p| p.into_inner());
            if now.duration_since(*last_cleanup) >= self.cleanup_interval {
                *last_cleanup = now;
                true
            } else {
                false
            }
        };
        if periodic || self.requests.len() > self.max_tracked_ips {
            self.purge_stale_entries(now);
        }

        let mut entry = self.requests.entry(ip.to_string()).or_default();
        let timestamps = entry.value_mut();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() < self.max_requests as usize {
            timestamps.push(now);
            true
        } else {
            false
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked(&self) -> usize {
        self.requests.len()
    }

    fn purge_stale_entries(&self, now: Instant) {
        let window = self.window;
        self.requests.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < window);
            !timestamps.is_empty()
        });
    }

    fn client_ip(&self, request: &Request) -> String {
        self.trust_proxy
            .then(|| forwarded_for(request.headers()))
            .flatten()
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// First hop of `X-Forwarded-For`.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&request);

    if limiter.check(&ip) {
        next.run(request).await
    } else {
        tracing::warn!("Rate limit exceeded for {}", ip);
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "Too many requests",
                "message": "Please try again later",
                "retryAfter": limiter.retry_after_secs
            })),
        )
            .into_response()
    }
}
