//! Head-to-head comparison of two flights
//!
//! Only pairwise comparison is supported. Any other number of flights yields
//! an empty summary rather than an error.
//!
//! Ties are broken in favour of the first flight: on an exact price tie the
//! first flight is reported cheaper, on an exact duration tie it is reported
//! faster, and a pair tied on both is recommended on the first flight for
//! "Lower cost".

use crate::display::format_price;
use crate::duration::split_hours;
use crate::normalize::{NormalizedFlight, Normalizer};
use crate::Flight;
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Price,
    Duration,
    Recommendation,
}

impl InsightKind {
    pub fn icon(&self) -> &'static str {
        match self {
            InsightKind::Price => "💰",
            InsightKind::Duration => "⏱️",
            InsightKind::Recommendation => "⭐",
        }
    }
}

/// One comparison fact. `label` names the flight the fact is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonInsight {
    pub kind: InsightKind,
    pub icon: String,
    pub label: String,
    pub text: String,
}

impl ComparisonInsight {
    fn new(kind: InsightKind, label: String, text: String) -> Self {
        Self {
            kind,
            icon: kind.icon().to_string(),
            label,
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationReason {
    #[serde(rename = "Lower cost and shorter travel time")]
    LowerCostAndShorterTime,
    #[serde(rename = "Lower cost")]
    LowerCost,
}

impl fmt::Display for RecommendationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationReason::LowerCostAndShorterTime => {
                write!(f, "Lower cost and shorter travel time")
            }
            RecommendationReason::LowerCost => write!(f, "Lower cost"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub flight: &'a Flight,
    /// Position of the recommended flight in the compared pair
    pub index: usize,
    pub label: String,
    pub reason: RecommendationReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary<'a> {
    pub insights: Vec<ComparisonInsight>,
    pub recommendation: Option<Recommendation<'a>>,
}

impl ComparisonSummary<'_> {
    fn empty() -> Self {
        Self {
            insights: Vec::new(),
            recommendation: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.recommendation.is_none()
    }

    pub fn insight(&self, kind: InsightKind) -> Option<&ComparisonInsight> {
        self.insights.iter().find(|i| i.kind == kind)
    }
}

fn format_hours(hours: f64) -> String {
    let (h, m) = split_hours(hours);
    format!("{}h {}m", h, m)
}

fn price_insight(cheaper: &NormalizedFlight<'_>, other: &NormalizedFlight<'_>) -> ComparisonInsight {
    let same_currency = cheaper.currency.eq_ignore_ascii_case(&other.currency);
    let text = if cheaper.price == other.price && same_currency {
        format!(
            "Both flights cost {}",
            format_price(cheaper.price, &cheaper.currency)
        )
    } else if cheaper.price == other.price {
        // Amounts are not converted, so a tie across currencies names both
        format!(
            "Both flights cost the same amount ({} vs {})",
            format_price(cheaper.price, &cheaper.currency),
            format_price(other.price, &other.currency),
        )
    } else {
        format!(
            "{} is cheaper by {} ({} vs {})",
            cheaper.label(),
            format_price((other.price - cheaper.price).abs(), &cheaper.currency),
            format_price(cheaper.price, &cheaper.currency),
            format_price(other.price, &other.currency),
        )
    };
    ComparisonInsight::new(InsightKind::Price, cheaper.label(), text)
}

fn duration_insight(faster: &NormalizedFlight<'_>, other: &NormalizedFlight<'_>) -> ComparisonInsight {
    let text = if faster.duration_hours == other.duration_hours {
        format!("Both flights take {}", format_hours(faster.duration_hours))
    } else {
        format!(
            "{} is faster by {} ({} vs {})",
            faster.label(),
            format_hours((other.duration_hours - faster.duration_hours).abs()),
            format_hours(faster.duration_hours),
            format_hours(other.duration_hours),
        )
    };
    ComparisonInsight::new(InsightKind::Duration, faster.label(), text)
}

/// Derive price, duration and recommendation insights for exactly two flights
#[instrument(level = "debug", skip(flights), fields(count = flights.len()))]
pub fn summarize<'a>(flights: &[NormalizedFlight<'a>]) -> ComparisonSummary<'a> {
    let [a, b] = flights else {
        debug!("Comparison needs exactly two flights, returning empty summary");
        return ComparisonSummary::empty();
    };
    let pair = [a, b];

    let cheaper = if b.price < a.price { 1 } else { 0 };
    let faster = if b.duration_hours < a.duration_hours { 1 } else { 0 };
    let exact_tie = a.price == b.price && a.duration_hours == b.duration_hours;

    let price = price_insight(pair[cheaper], pair[1 - cheaper]);
    let duration = duration_insight(pair[faster], pair[1 - faster]);

    let reason = if cheaper == faster && !exact_tie {
        RecommendationReason::LowerCostAndShorterTime
    } else {
        RecommendationReason::LowerCost
    };
    let recommended = pair[cheaper];
    let recommendation = Recommendation {
        flight: recommended.flight,
        index: cheaper,
        label: recommended.label(),
        reason,
    };

    debug!(
        cheaper,
        faster,
        recommended = %recommendation.label,
        reason = %reason,
        "Comparison summarized"
    );

    let recommendation_insight = ComparisonInsight::new(
        InsightKind::Recommendation,
        recommendation.label.clone(),
        format!("{} is recommended: {}", recommendation.label, reason),
    );

    ComparisonSummary {
        insights: vec![price, duration, recommendation_insight],
        recommendation: Some(recommendation),
    }
}

/// Normalized rows plus the pairwise summary, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport<'a> {
    pub flights: Vec<NormalizedFlight<'a>>,
    pub summary: ComparisonSummary<'a>,
}

/// Normalize `flights` and summarize them in one step
pub fn compare_flights<'a>(flights: &'a [Flight], normalizer: &Normalizer) -> ComparisonReport<'a> {
    let normalized = normalizer.normalize(flights);
    let summary = summarize(&normalized);
    ComparisonReport {
        flights: normalized,
        summary,
    }
}

/// The selected flight plus the first alternative that is a different flight.
///
/// This is how a result list is cut down to a comparable pair.
pub fn comparison_candidates(selected: &Flight, alternatives: &[Flight]) -> Vec<Flight> {
    let mut candidates = vec![selected.clone()];
    let alternative = alternatives.iter().find(|alt| match selected.selection_id() {
        Some(id) => alt.selection_id() != Some(id),
        None => *alt != selected,
    });
    if let Some(alternative) = alternative {
        candidates.push(alternative.clone());
    }
    candidates
}
