//! In-memory providers for orchestration tests.

#![allow(dead_code)]

use futures::future::BoxFuture;
use rush_core::{
    Coordinate, GeocodeProvider, ProviderError, ProviderLeg, ProviderRoute, ProviderStep,
    ProviderTrip, RouteProvider, TripProvider,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;

/// Resolves exact query strings from a fixed gazetteer.
#[derive(Default)]
pub struct Gazetteer {
    places: HashMap<String, Coordinate>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl Gazetteer {
    pub fn with(mut self, name: &str, lat: f64, lon: f64) -> Self {
        self.places.insert(name.to_string(), Coordinate::new(lat, lon));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl GeocodeProvider for Gazetteer {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Coordinate>, ProviderError>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), Instant::now()));
        let found: Vec<Coordinate> = self.places.get(query).copied().into_iter().collect();
        Box::pin(async move { Ok(found) })
    }
}

pub fn straight_route(
    from: Coordinate,
    to: Coordinate,
    distance_m: f64,
    duration_s: f64,
) -> ProviderRoute {
    ProviderRoute {
        distance_m,
        duration_s,
        geometry: vec![from, to],
        legs: vec![ProviderLeg {
            distance_m,
            duration_s,
            geometry: vec![from, to],
            steps: vec![
                ProviderStep {
                    maneuver_type: "depart".to_string(),
                    modifier: None,
                    distance_m,
                    duration_s,
                    name: Some(format!("{:.2}", from.lat)),
                },
                ProviderStep {
                    maneuver_type: "arrive".to_string(),
                    ..ProviderStep::default()
                },
            ],
        }],
    }
}

/// Routes between known coordinate pairs; anything else has no route.
#[derive(Default)]
pub struct PairRouter {
    routes: Vec<(Coordinate, Coordinate, ProviderRoute)>,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl PairRouter {
    pub fn with(
        mut self,
        from: Coordinate,
        to: Coordinate,
        distance_m: f64,
        duration_s: f64,
    ) -> Self {
        self.routes
            .push((from, to, straight_route(from, to, distance_m, duration_s)));
        self
    }

    pub fn calls(&self) -> Vec<(Coordinate, Coordinate)> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteProvider for PairRouter {
    fn name(&self) -> &'static str {
        "pairs"
    }

    fn routes<'a>(
        &'a self,
        origin: Coordinate,
        destination: Coordinate,
        _alternatives: u32,
    ) -> BoxFuture<'a, Result<Vec<ProviderRoute>, ProviderError>> {
        self.calls.lock().unwrap().push((origin, destination));
        let found: Vec<ProviderRoute> = self
            .routes
            .iter()
            .filter(|(from, to, _)| *from == origin && *to == destination)
            .map(|(_, _, route)| route.clone())
            .collect();
        Box::pin(async move { Ok(found) })
    }
}

/// Returns a canned trip for any stop list.
pub struct CannedTrip(pub Option<ProviderTrip>);

impl TripProvider for CannedTrip {
    fn trip<'a>(
        &'a self,
        _stops: &'a [Coordinate],
    ) -> BoxFuture<'a, Result<Option<ProviderTrip>, ProviderError>> {
        let trip = self.0.clone();
        Box::pin(async move { Ok(trip) })
    }
}
