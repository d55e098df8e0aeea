// Risk banding - maps a fraud probability onto the three display bands

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// `< 0.25` is low, `< 0.75` is medium, everything else (including NaN) is high.
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.25 {
            RiskBand::Low
        } else if probability < 0.75 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskBand::Low => "#22c55e",
            RiskBand::Medium => "#f59e0b",
            RiskBand::High => "#ef4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            RiskBand::Low => "😊",
            RiskBand::Medium => "🤔",
            RiskBand::High => "😈",
        }
    }
}

/// `0.9940192741004935` -> `"99.40%"`
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}
