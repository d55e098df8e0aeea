use serde::{Deserialize, Serialize};

use super::graph_models::TransactionGraph;
use crate::core::RiskBand;

/// Body of `POST /api/classify`, forwarded upstream as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub wallet_address: String,
    pub model_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub fraud_probability: f64,
    pub graph: TransactionGraph,
}

impl ClassificationRequest {
    pub fn new(wallet_address: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            model_name: model_name.into(),
        }
    }
}

impl ClassificationResult {
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_probability(self.fraud_probability)
    }
}
