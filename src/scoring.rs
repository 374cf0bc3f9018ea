//! Heuristic scores used to rank flights
//!
//! These are simple linear heuristics, not learned models. The convenience
//! score looks only at the stop count and the value score blends price with
//! convenience using [`ScoringWeights`].

use crate::CompareError;
use serde::{Deserialize, Serialize};

const BASE_CONVENIENCE: f64 = 0.5;
const NONSTOP_BONUS: f64 = 0.3;
const PER_STOP_PENALTY: f64 = 0.1;

/// Clamp a score into `[0, 1]`
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Convenience in `[0, 1]` from the stop count (absent counts as non-stop).
///
/// Non-stop scores 0.8, each stop costs 0.1 from a 0.5 base.
pub fn convenience_score(stops: Option<u32>) -> f64 {
    let score = match stops.unwrap_or(0) {
        0 => BASE_CONVENIENCE + NONSTOP_BONUS,
        n => BASE_CONVENIENCE - PER_STOP_PENALTY * f64::from(n),
    };
    clamp01(score)
}

/// Relative weight of price and convenience in the composite value score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub price: f64,
    pub convenience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price: 0.7,
            convenience: 0.3,
        }
    }
}

impl ScoringWeights {
    /// Create weights, rescaled so they sum to 1
    pub fn new(price: f64, convenience: f64) -> Result<Self, CompareError> {
        Self { price, convenience }.normalized()
    }

    /// Validate and rescale so the weights sum to 1
    pub fn normalized(self) -> Result<Self, CompareError> {
        for (name, weight) in [("price", self.price), ("convenience", self.convenience)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CompareError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let total = self.price + self.convenience;
        if total <= 0.0 {
            return Err(CompareError::InvalidWeights(
                "weights must not both be zero".to_string(),
            ));
        }

        Ok(Self {
            price: self.price / total,
            convenience: self.convenience / total,
        })
    }
}

/// Composite value score in `[0, 1]`, higher is better.
///
/// `max_price` is expected to be floored at 1 by the caller.
pub fn value_score(price: f64, max_price: f64, convenience: f64, weights: &ScoringWeights) -> f64 {
    let max_price = max_price.max(1.0);
    clamp01((max_price - price) / max_price * weights.price + convenience * weights.convenience)
}
