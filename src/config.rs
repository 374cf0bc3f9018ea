//! Comparison configuration
//!
//! All fields have defaults, so an empty JSON object (or no file at all) is a
//! valid configuration.

use crate::scoring::ScoringWeights;
use crate::{CompareError, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Currency code assumed for records that carry none
    pub default_currency: String,
    /// Price / convenience blend for the composite value score
    pub weights: ScoringWeights,
    /// How many of the cheapest flights are flagged as best deals
    pub best_deal_count: usize,
    /// Non-stop flights within this many cheapest are also flagged
    pub direct_window: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
            weights: ScoringWeights::default(),
            best_deal_count: 3,
            direct_window: 5,
        }
    }
}

impl CompareConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, CompareError> {
        let config: CompareConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompareError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading comparison config");
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(
            path = %path.display(),
            default_currency = %config.default_currency,
            price_weight = config.weights.price,
            convenience_weight = config.weights.convenience,
            "Comparison config loaded"
        );
        Ok(config)
    }

    /// Check invariants and normalize the weights
    pub fn validate(mut self) -> Result<Self, CompareError> {
        let currency = self.default_currency.trim().to_uppercase();
        if currency.is_empty() {
            return Err(CompareError::InvalidInput(
                "default_currency must not be empty".to_string(),
            ));
        }
        self.default_currency = currency;
        self.weights = self.weights.normalized()?;
        Ok(self)
    }
}
