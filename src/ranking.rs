//! Result list ranking and best-deal flags

use crate::config::CompareConfig;
use crate::Flight;
use std::cmp::Ordering;
use tracing::debug;

const HOUR_PENALTY: f64 = 20.0;
const STOP_PENALTY: f64 = 50.0;

/// Sort cheapest first and flag best deals.
///
/// The `best_deal_count` cheapest flights are flagged, plus any non-stop
/// flight among the `direct_window` cheapest. Existing flags are reset.
pub fn mark_best_deals(flights: &mut [Flight], config: &CompareConfig) {
    if flights.is_empty() {
        return;
    }

    flights.sort_by(|a, b| {
        a.price_or_default()
            .partial_cmp(&b.price_or_default())
            .unwrap_or(Ordering::Equal)
    });

    for (i, flight) in flights.iter_mut().enumerate() {
        let cheap = i < config.best_deal_count;
        let direct = i < config.direct_window && flight.stops_or_default() == 0;
        flight.is_optimal = cheap || direct;
    }

    debug!(
        flagged = flights.iter().filter(|f| f.is_optimal).count(),
        total = flights.len(),
        "Best deals marked"
    );
}

/// Lower-is-better cost of travel: price plus penalties per hour and per stop
pub fn travel_cost_index(flight: &Flight) -> f64 {
    flight.price_or_default()
        + flight.duration_hours() * HOUR_PENALTY
        + f64::from(flight.stops_or_default()) * STOP_PENALTY
}

/// Stable sort by [`travel_cost_index`], best first
pub fn rank_by_travel_cost(flights: &mut [Flight]) {
    flights.sort_by(|a, b| {
        travel_cost_index(a)
            .partial_cmp(&travel_cost_index(b))
            .unwrap_or(Ordering::Equal)
    });
}
