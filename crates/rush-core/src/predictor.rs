//! The congestion scoring capability.
//!
//! The model itself is opaque: implementations may shell out to an external
//! scorer or evaluate something in-process.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::congestion::clamp_score;
use crate::error::PredictionFailure;

/// Categorical trip attributes fed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub area: String,
    pub road: String,
    pub weather: String,
    pub roadwork: String,
    pub date: Option<String>,
}

impl PredictionInput {
    /// Positional arguments in the order the scorer expects.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.area.clone(),
            self.road.clone(),
            self.weather.clone(),
            self.roadwork.clone(),
        ];
        if let Some(date) = self.date.as_ref().filter(|d| !d.trim().is_empty()) {
            args.push(date.clone());
        }
        args
    }
}

pub trait Predictor: Send + Sync {
    /// Raw model output, before rounding and clamping.
    fn predict<'a>(
        &'a self,
        input: &'a PredictionInput,
    ) -> BoxFuture<'a, Result<f64, PredictionFailure>>;
}

/// Parse a scorer's single-line numeric output.
pub fn parse_score_output(stdout: &str, stderr: &str) -> Result<f64, PredictionFailure> {
    let trimmed = stdout.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PredictionFailure::Unparseable {
            output: trimmed.to_string(),
            stderr: stderr.to_string(),
        }),
    }
}

/// Score in 0..=100 for `input`.
pub async fn predict_score(
    predictor: &dyn Predictor,
    input: &PredictionInput,
) -> Result<u8, PredictionFailure> {
    let raw = predictor.predict(input).await?;
    Ok(clamp_score(raw))
}
