//! Per-set normalization of flight metrics
//!
//! Metrics are rescaled against the maxima of the set being compared and
//! inverted so that 1.0 is always the favourable end.

use crate::config::CompareConfig;
use crate::scoring::{convenience_score, value_score, ScoringWeights};
use crate::{Flight, DEFAULT_CURRENCY};
use serde::Serialize;
use tracing::{debug, instrument};

/// Normalized `[0, 1]` metrics, higher is better
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedMetrics {
    pub price: f64,
    pub duration: f64,
    pub stops: f64,
    pub convenience: f64,
}

/// Read-only view of a flight with its computed comparison metrics.
///
/// Borrows the source record, so it only lives as long as the comparison
/// that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedFlight<'a> {
    pub flight: &'a Flight,
    pub price: f64,
    pub currency: String,
    pub duration_hours: f64,
    pub stops: u32,
    pub convenience: f64,
    pub normalized: NormalizedMetrics,
    pub value_score: f64,
}

impl NormalizedFlight<'_> {
    pub fn label(&self) -> String {
        self.flight.display_label()
    }
}

/// Computes [`NormalizedFlight`]s for a candidate set
#[derive(Debug, Clone)]
pub struct Normalizer {
    weights: ScoringWeights,
    default_currency: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Normalizer {
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            weights: config.weights,
            default_currency: config.default_currency.clone(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Normalize every flight against the maxima of `flights`, keeping input order
    #[instrument(level = "debug", skip(self, flights), fields(count = flights.len()))]
    pub fn normalize<'a>(&self, flights: &'a [Flight]) -> Vec<NormalizedFlight<'a>> {
        if flights.is_empty() {
            return Vec::new();
        }

        let raw: Vec<(f64, f64, u32)> = flights
            .iter()
            .map(|f| (f.price_or_default(), f.duration_hours(), f.stops_or_default()))
            .collect();

        // Floored at 1 so an all-zero set never divides by zero
        let max_price = raw.iter().map(|r| r.0).fold(1.0_f64, f64::max);
        let max_duration = raw.iter().map(|r| r.1).fold(1.0_f64, f64::max);
        let max_stops = raw.iter().map(|r| f64::from(r.2)).fold(1.0_f64, f64::max);

        debug!(max_price, max_duration, max_stops, "Computed comparison maxima");

        flights
            .iter()
            .zip(raw)
            .map(|(flight, (price, duration_hours, stops))| {
                let convenience = convenience_score(Some(stops));
                NormalizedFlight {
                    flight,
                    price,
                    currency: flight.currency_or(&self.default_currency).to_string(),
                    duration_hours,
                    stops,
                    convenience,
                    normalized: NormalizedMetrics {
                        price: 1.0 - price / max_price,
                        duration: 1.0 - duration_hours / max_duration,
                        stops: 1.0 - f64::from(stops) / max_stops,
                        convenience,
                    },
                    value_score: value_score(price, max_price, convenience, &self.weights),
                }
            })
            .collect()
    }
}

/// Normalize with the default weights and currency
pub fn normalize_flights(flights: &[Flight]) -> Vec<NormalizedFlight<'_>> {
    Normalizer::default().normalize(flights)
}
