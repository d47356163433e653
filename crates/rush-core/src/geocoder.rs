//! Place-name geocoding with query fallbacks and retries.
//!
//! A place is tried as progressively less specific queries (see
//! [`GeocodePolicy::variants`]); each query is attempted up to
//! `max_attempts` times. Attempts are strictly sequential and every attempt
//! except the very first is preceded by `retry_delay`.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::GeocodeFailure;
use crate::models::Coordinate;
use crate::provider::GeocodeProvider;
use crate::spacer::RequestSpacer;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GeocodePolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    /// Region context appended to queries, most specific first.
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Default for GeocodePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            city: None,
            country: None,
        }
    }
}

impl GeocodePolicy {
    pub fn for_region(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()).filter(|c: &String| !c.trim().is_empty()),
            country: Some(country.into()).filter(|c: &String| !c.trim().is_empty()),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay = retry_delay;
        self
    }

    /// Query strings for `place`, most specific first:
    /// `name, city, country` / `head, city, country` / `name, city` / `name`,
    /// where `head` is the text before the first comma.
    pub fn variants(&self, place: &str) -> Vec<String> {
        let name = place.trim();
        let head = name.split(',').next().unwrap_or(name).trim();
        let city = self.city.as_deref();
        let country = self.country.as_deref();

        let mut variants = vec![
            with_region(name, &[city, country]),
            with_region(head, &[city, country]),
            with_region(name, &[city]),
            name.to_string(),
        ];
        variants.dedup();
        variants
    }
}

fn with_region(base: &str, parts: &[Option<&str>]) -> String {
    let mut query = base.to_string();
    for part in parts.iter().flatten() {
        let part = part.trim();
        if !part.is_empty() {
            query.push_str(", ");
            query.push_str(part);
        }
    }
    query
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AttemptOutcome {
    Found,
    NoResult,
    Failed(String),
}

/// One provider call made while resolving a place name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeAttempt {
    pub query: String,
    /// Index into the policy's variant list.
    pub variant: usize,
    /// 1-based attempt number within the variant.
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Resolves place names through a [`GeocodeProvider`].
///
/// Clones share the provider and the request spacer, so a single geocoder
/// used for a whole multi-stop run keeps every provider call spaced.
#[derive(Clone)]
pub struct Geocoder {
    provider: Arc<dyn GeocodeProvider>,
    policy: Arc<GeocodePolicy>,
    spacer: RequestSpacer,
}

impl Geocoder {
    pub fn new(
        provider: Arc<dyn GeocodeProvider>,
        policy: GeocodePolicy,
        spacer: RequestSpacer,
    ) -> Self {
        Self {
            provider,
            policy: Arc::new(policy),
            spacer,
        }
    }

    pub fn policy(&self) -> &GeocodePolicy {
        &self.policy
    }

    /// A geocoder with the same provider and policy but its own schedule.
    pub fn detached(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            policy: self.policy.clone(),
            spacer: RequestSpacer::new(self.spacer.interval()),
        }
    }

    pub async fn geocode(&self, place: &str) -> Result<Coordinate, GeocodeFailure> {
        let mut attempts = Vec::new();
        if place.trim().is_empty() {
            return Err(GeocodeFailure {
                place: place.to_string(),
                attempts,
            });
        }

        let max_attempts = self.policy.max_attempts.max(1);
        for (variant, query) in self.policy.variants(place).into_iter().enumerate() {
            for attempt in 1..=max_attempts {
                if attempt > 1 || variant > 0 {
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                self.spacer.acquire().await;

                let outcome = match self.provider.search(&query).await {
                    Ok(results) => match results.first() {
                        Some(coordinate) => {
                            tracing::info!(
                                "Geocoded {:?} using query {:?} (attempt {})",
                                place,
                                query,
                                attempt
                            );
                            return Ok(*coordinate);
                        }
                        None => {
                            tracing::warn!(
                                "No results for {:?} using query {:?} (attempt {}/{})",
                                place,
                                query,
                                attempt,
                                max_attempts
                            );
                            AttemptOutcome::NoResult
                        }
                    },
                    Err(err) => {
                        tracing::warn!(
                            "Geocoding error for {:?} (attempt {}/{}): {}",
                            place,
                            attempt,
                            max_attempts,
                            err
                        );
                        AttemptOutcome::Failed(err.to_string())
                    }
                };
                attempts.push(GeocodeAttempt {
                    query: query.clone(),
                    variant,
                    attempt,
                    outcome,
                });
            }
        }

        tracing::error!("Failed to geocode {:?} after trying all query formats", place);
        Err(GeocodeFailure {
            place: place.to_string(),
            attempts,
        })
    }
}
