//! Nominatim search API client.

use futures::future::BoxFuture;
use reqwest::Client;
use rush_core::{Coordinate, GeocodeProvider, ProviderError};
use serde::Deserialize;
use std::time::Duration;

use crate::http::{send_json, trim_base};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// HTTP client for the Nominatim `/search` endpoint.
///
/// Nominatim's usage policy requires an identifying User-Agent and at most
/// one request per second; spacing is the caller's job (see
/// `rush_core::RequestSpacer`).
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

impl NominatimClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    async fn search_once(&self, query: &str) -> Result<Vec<Coordinate>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout);

        let results: Vec<SearchResult> = send_json(request).await?;
        Ok(results
            .iter()
            .filter_map(|result| {
                let lat = result.lat.trim().parse::<f64>().ok()?;
                let lon = result.lon.trim().parse::<f64>().ok()?;
                let coordinate = Coordinate::new(lat, lon);
                coordinate.is_valid().then_some(coordinate)
            })
            .collect())
    }
}

impl GeocodeProvider for NominatimClient {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Coordinate>, ProviderError>> {
        Box::pin(self.search_once(query))
    }
}
