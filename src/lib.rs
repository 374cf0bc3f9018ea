//! # Flight Compare Library
//!
//! Client-side flight comparison for travel-planning front ends: duration
//! parsing, convenience scoring, per-set normalization, head-to-head insights
//! and the session selection store the UI shares between its components.
//!
//! Search results come from an external collaborator as [`Flight`] records;
//! everything here is synchronous and never fails on malformed records.

pub mod compare;
pub mod config;
pub mod display;
pub mod duration;
pub mod itinerary;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod selection;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types for convenience
pub use compare::{
    compare_flights, comparison_candidates, summarize, ComparisonInsight, ComparisonReport,
    ComparisonSummary, InsightKind, Recommendation, RecommendationReason,
};
pub use config::CompareConfig;
pub use duration::{duration_hours, format_iso_duration, parse_duration, ParsedDuration};
pub use itinerary::{Itinerary, ItineraryLeg};
pub use normalize::{normalize_flights, NormalizedFlight, NormalizedMetrics, Normalizer};
pub use scoring::{convenience_score, value_score, ScoringWeights};
pub use selection::{SelectionStore, ToggleOutcome};

/// Currency assumed when a record carries none
pub const DEFAULT_CURRENCY: &str = "USD";

/// Error types for the comparison library
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("I/O failed: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),

    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Flight record as delivered by the search collaborator.
///
/// Every field is optional on the wire; missing values are resolved through
/// the `*_or_default` accessors rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Flight {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_date: Option<String>,
    pub arrival_date: Option<String>,
    /// `PT#H#M` or `#h #m`
    pub duration: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stops: Option<u32>,
    pub booking_link: Option<String>,
    pub cabin_class: Option<String>,
    pub is_optimal: bool,
}

impl Flight {
    /// Id usable for selection, if present and non-blank
    pub fn selection_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    pub fn price_or_default(&self) -> f64 {
        match self.price {
            Some(price) if price.is_finite() => price.max(0.0),
            _ => 0.0,
        }
    }

    pub fn stops_or_default(&self) -> u32 {
        self.stops.unwrap_or(0)
    }

    pub fn currency_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default)
    }

    /// Parsed duration in fractional hours (0 when absent or unparseable)
    pub fn duration_hours(&self) -> f64 {
        duration::duration_hours(self.duration.as_deref())
    }

    /// Label shown next to insights, e.g. "Delta Airlines DL1234"
    pub fn display_label(&self) -> String {
        let airline = self.airline.trim();
        let airline = if is_carrier_code(airline) {
            display::airline_name(airline)
        } else {
            airline
        };
        let label = format!("{} {}", airline, self.flight_number.trim());
        let label = label.trim();
        if !label.is_empty() {
            return label.to_string();
        }
        self.selection_id()
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown flight".to_string())
    }
}

// Two character IATA designator such as `DL` or `B6`
fn is_carrier_code(airline: &str) -> bool {
    airline.len() == 2
        && airline
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Ids arrive as strings or bare numbers depending on the source
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

/// Search results as delivered by the collaborator: either a bare JSON array
/// of flights or an object carrying them under `flights`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlightPayload {
    List(Vec<Flight>),
    Wrapped { flights: Vec<Flight> },
}

/// Parse flight records from JSON text
pub fn parse_flights(json: &str) -> Result<Vec<Flight>, CompareError> {
    let flights = match serde_json::from_str::<FlightPayload>(json)? {
        FlightPayload::List(flights) | FlightPayload::Wrapped { flights } => flights,
    };
    Ok(flights)
}

/// Read flight records from a JSON file
pub fn load_flights(path: impl AsRef<std::path::Path>) -> Result<Vec<Flight>, CompareError> {
    let text = std::fs::read_to_string(path)?;
    parse_flights(&text)
}
