//! Traffic prediction API: route planning, geocoding and congestion scoring over HTTP.

pub mod api;
pub mod catalog;
pub mod config;
pub mod predictor;
pub mod state;
