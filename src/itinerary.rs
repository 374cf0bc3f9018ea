//! Itinerary and cost summary for the selected flights

use crate::config::CompareConfig;
use crate::display::{format_date_display, format_price, format_time_display};
use crate::duration::{format_iso_duration, split_hours};
use crate::selection::SelectionStore;
use crate::Flight;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// One leg of an itinerary, pre-formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryLeg {
    pub id: Option<String>,
    pub label: String,
    pub route: String,
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub stops: u32,
    pub price: String,
    pub booking_link: Option<String>,
}

/// Selected flights with totals. Totals are kept per currency, never converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub legs: Vec<ItineraryLeg>,
    pub totals: BTreeMap<String, f64>,
    pub formatted_totals: Vec<String>,
    pub total_hours: f64,
    pub total_duration: String,
    pub total_stops: u32,
}

impl Itinerary {
    /// Build an itinerary from flights in travel order
    #[instrument(level = "debug", skip(flights), fields(count = flights.len()))]
    pub fn build(flights: &[Flight], default_currency: &str) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_hours = 0.0;
        let mut total_stops = 0;

        let legs = flights
            .iter()
            .map(|flight| {
                let currency = flight.currency_or(default_currency).to_uppercase();
                let price = flight.price_or_default();
                let hours = flight.duration_hours();
                let stops = flight.stops_or_default();

                *totals.entry(currency.clone()).or_insert(0.0) += price;
                total_hours += hours;
                total_stops += stops;

                ItineraryLeg {
                    id: flight.selection_id().map(str::to_string),
                    label: flight.display_label(),
                    route: format!("{} → {}", flight.departure_airport, flight.arrival_airport),
                    date: flight
                        .departure_date
                        .as_deref()
                        .map(format_date_display)
                        .unwrap_or_default(),
                    departure_time: format_time_display(&flight.departure_time),
                    arrival_time: format_time_display(&flight.arrival_time),
                    duration: flight
                        .duration
                        .as_deref()
                        .map(format_iso_duration)
                        .unwrap_or_else(|| "N/A".to_string()),
                    stops,
                    price: format_price(price, &currency),
                    booking_link: flight.booking_link.clone(),
                }
            })
            .collect::<Vec<_>>();

        let formatted_totals = totals
            .iter()
            .map(|(currency, amount)| format_price(*amount, currency))
            .collect();
        let (h, m) = split_hours(total_hours);

        info!(
            legs = legs.len(),
            currencies = totals.len(),
            total_hours,
            "Itinerary built"
        );

        Self {
            legs,
            totals,
            formatted_totals,
            total_hours,
            total_duration: format!("{}h {}m", h, m),
            total_stops,
        }
    }

    /// Build an itinerary from the current selection, in selection order
    pub fn from_selection(selection: &SelectionStore, config: &CompareConfig) -> Self {
        Self::build(selection.all(), &config.default_currency)
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(id: &str, price: f64, currency: Option<&str>, duration: &str, stops: u32) -> Flight {
        Flight {
            id: Some(id.to_string()),
            airline: "Delta Airlines".to_string(),
            flight_number: format!("DL{}", id),
            departure_airport: "LAX".to_string(),
            arrival_airport: "JFK".to_string(),
            departure_date: Some("2025-08-15".to_string()),
            duration: Some(duration.to_string()),
            price: Some(price),
            currency: currency.map(str::to_string),
            stops: Some(stops),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_totals() {
        let flights = vec![
            flight("1", 250.0, None, "5h 30m", 0),
            flight("2", 199.5, Some("USD"), "PT6H15M", 1),
        ];
        let itinerary = Itinerary::build(&flights, "USD");

        assert_eq!(itinerary.legs.len(), 2);
        assert_eq!(itinerary.totals.get("USD"), Some(&449.5));
        assert_eq!(itinerary.formatted_totals, vec!["$449.50".to_string()]);
        assert_eq!(itinerary.total_duration, "11h 45m");
        assert_eq!(itinerary.total_stops, 1);

        let leg = &itinerary.legs[0];
        assert_eq!(leg.label, "Delta Airlines DL1");
        assert_eq!(leg.route, "LAX → JFK");
        assert_eq!(leg.date, "Aug 15, 2025");
        assert_eq!(leg.price, "$250");
        assert_eq!(leg.duration, "5h 30m");
        assert_eq!(itinerary.legs[1].duration, "6h 15m");
    }

    #[test]
    fn test_leg_display_formatting() {
        let mut coded = flight("7", 300.0, None, "PT7H5M", 0);
        coded.airline = "UA".to_string();
        coded.flight_number = "UA7".to_string();
        coded.departure_time = "2025-08-15T07:05:00".to_string();
        coded.arrival_time = "2025-08-15T14:10:00-04:00".to_string();

        let mut bare = flight("8", 100.0, None, "", 0);
        bare.duration = None;

        let itinerary = Itinerary::build(&[coded, bare], "USD");
        let leg = &itinerary.legs[0];
        assert_eq!(leg.label, "United Airlines UA7");
        assert_eq!(leg.departure_time, "07:05 AM");
        assert_eq!(leg.arrival_time, "02:10 PM");
        assert_eq!(leg.duration, "7h 5m");

        let leg = &itinerary.legs[1];
        assert_eq!(leg.departure_time, "N/A");
        assert_eq!(leg.arrival_time, "N/A");
        assert_eq!(leg.duration, "N/A");
    }

    #[test]
    fn test_totals_per_currency() {
        let flights = vec![
            flight("1", 100.0, Some("eur"), "1h", 0),
            flight("2", 80.0, Some("GBP"), "1h", 0),
            flight("3", 50.0, Some("EUR"), "1h", 0),
        ];
        let itinerary = Itinerary::build(&flights, "USD");
        assert_eq!(itinerary.totals.len(), 2);
        assert_eq!(itinerary.totals.get("EUR"), Some(&150.0));
        assert_eq!(
            itinerary.formatted_totals,
            vec!["€150".to_string(), "£80".to_string()]
        );
    }

    #[test]
    fn test_from_selection() {
        let mut selection = SelectionStore::new();
        assert!(Itinerary::from_selection(&selection, &CompareConfig::default()).is_empty());

        selection.toggle(flight("2", 120.0, None, "2h", 0));
        selection.toggle(flight("1", 80.0, None, "1h", 0));
        let itinerary = Itinerary::from_selection(&selection, &CompareConfig::default());
        let ids: Vec<_> = itinerary.legs.iter().filter_map(|l| l.id.as_deref()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(itinerary.totals.get("USD"), Some(&200.0));
    }
}
