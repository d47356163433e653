//! Shared application state: configuration and provider handles.

use anyhow::{Context, Result};
use rush_core::{
    GeocodePolicy, GeocodeProvider, Geocoder, Predictor, RequestSpacer, RouteProvider,
    TripProvider,
};
use rush_providers::{GoogleRoutesClient, NominatimClient, OsrmClient};
use std::sync::Arc;

use crate::config::Config;
use crate::predictor::SubprocessPredictor;

pub struct AppState {
    pub config: Config,
    geocoder: Geocoder,
    router: Arc<dyn RouteProvider>,
    trips: Arc<dyn TripProvider>,
    google: Option<Arc<dyn RouteProvider>>,
    predictor: Arc<dyn Predictor>,
}

/// Provider handles, injectable so tests can run without the network.
pub struct Providers {
    pub geocoder: Arc<dyn GeocodeProvider>,
    pub router: Arc<dyn RouteProvider>,
    pub trips: Arc<dyn TripProvider>,
    pub google: Option<Arc<dyn RouteProvider>>,
    pub predictor: Arc<dyn Predictor>,
}

pub fn geocode_policy(config: &Config) -> GeocodePolicy {
    GeocodePolicy {
        city: config.geocode_city.clone(),
        country: config.geocode_country.clone(),
        ..GeocodePolicy::default()
    }
    .with_retries(config.geocode_max_attempts, config.geocode_retry_delay)
}

impl Providers {
    /// HTTP-backed providers as configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.geocode_user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;

        let osrm = Arc::new(
            OsrmClient::new(
                client.clone(),
                config.osrm_url.clone(),
                config.provider_timeout,
                config.multi_waypoint_timeout,
            )
            .with_profile(config.osrm_profile.clone()),
        );
        let google = config.google_routes_api_key.as_ref().map(|key| {
            Arc::new(GoogleRoutesClient::new(
                client.clone(),
                config.google_routes_url.clone(),
                key.clone(),
                config.provider_timeout,
            )) as Arc<dyn RouteProvider>
        });
        let nominatim = NominatimClient::new(
            client,
            config.nominatim_url.clone(),
            config.geocode_user_agent.clone(),
            config.provider_timeout,
        );

        Ok(Self {
            geocoder: Arc::new(nominatim),
            router: osrm.clone(),
            trips: osrm,
            google,
            predictor: Arc::new(SubprocessPredictor::from_config(config)),
        })
    }
}

impl AppState {
    pub fn new(config: Config, providers: Providers) -> Self {
        let geocoder = Geocoder::new(
            providers.geocoder,
            geocode_policy(&config),
            RequestSpacer::new(config.geocode_min_interval),
        );
        Self {
            config,
            geocoder,
            router: providers.router,
            trips: providers.trips,
            google: providers.google,
            predictor: providers.predictor,
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let providers = Providers::from_config(&config)?;
        Ok(Self::new(config, providers))
    }

    /// A geocoder with its own request schedule, for one unit of work.
    pub fn geocoder(&self) -> Geocoder {
        self.geocoder.detached()
    }

    pub fn router(&self) -> &dyn RouteProvider {
        self.router.as_ref()
    }

    pub fn trips(&self) -> &dyn TripProvider {
        self.trips.as_ref()
    }

    pub fn google(&self) -> Option<&dyn RouteProvider> {
        self.google.as_deref()
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }
}
