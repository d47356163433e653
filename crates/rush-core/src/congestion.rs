//! Congestion score post-processing.
//!
//! All functions here are pure functions of the 0-100 score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    Medium,
    High,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Severity::High
        } else if score >= 60 {
            Severity::Medium
        } else if score >= 40 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round a raw model output and clamp it into 0..=100.
pub fn clamp_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

pub fn estimated_delay(score: u8) -> &'static str {
    match Severity::from_score(score) {
        Severity::High => "15-25 minutes",
        Severity::Medium => "8-15 minutes",
        Severity::Moderate => "3-8 minutes",
        Severity::Low => "0-3 minutes",
    }
}

/// Travel-time multiplier, piecewise linear over four bands.
pub fn congestion_multiplier(score: u8) -> f64 {
    let score = f64::from(score.min(100));
    if score <= 25.0 {
        1.0 + (score / 100.0) * 0.6
    } else if score <= 50.0 {
        1.15 + ((score - 25.0) / 100.0) * 0.8
    } else if score <= 75.0 {
        1.35 + ((score - 50.0) / 100.0) * 1.4
    } else {
        1.7 + ((score - 75.0) / 100.0) * 3.2
    }
}

pub fn adjusted_duration(base_minutes: u64, score: u8) -> u64 {
    (base_minutes as f64 * congestion_multiplier(score)).round() as u64
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn recommended_action(score: u8, start: Option<&str>, destination: Option<&str>) -> String {
    let route = match (present(start), present(destination)) {
        (Some(start), Some(destination)) => format!(" from {} to {}", start, destination),
        _ => String::new(),
    };

    match Severity::from_score(score) {
        Severity::High => format!(
            "Avoid this route{}. Consider alternative paths like Outer Ring Road \
             or use public transport.",
            route
        ),
        Severity::Medium => format!(
            "Heavy traffic expected{}. Allow extra 15-20 minutes and consider leaving earlier.",
            route
        ),
        Severity::Moderate => format!(
            "Moderate traffic{}. Plan for potential 5-10 minute delays.",
            route
        ),
        Severity::Low => format!(
            "Light traffic{}. Good time to travel - optimal route conditions.",
            route
        ),
    }
}

/// Everything derived from one congestion score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionPrediction {
    #[serde(rename = "congestionLevel")]
    pub score: u8,
    pub severity: Severity,
    pub estimated_delay: String,
    pub recommended_action: String,
}

impl CongestionPrediction {
    pub fn from_score(score: u8, start: Option<&str>, destination: Option<&str>) -> Self {
        let score = score.min(100);
        Self {
            score,
            severity: Severity::from_score(score),
            estimated_delay: estimated_delay(score).to_string(),
            recommended_action: recommended_action(score, start, destination),
        }
    }
}
