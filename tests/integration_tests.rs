//! Integration tests for flight-compare
//!
//! These tests drive the public API the way a results page does: records come
//! in as JSON, the user toggles a selection, the selected pair is compared and
//! an itinerary is built from what remains selected.

use flight_compare::ranking::mark_best_deals;
use flight_compare::{
    compare_flights, comparison_candidates, convenience_score, duration_hours, normalize_flights,
    parse_flights, summarize, CompareConfig, Flight, InsightKind, Itinerary, Normalizer,
    RecommendationReason, ScoringWeights, SelectionStore, ToggleOutcome,
};

/// Search results in the shape the results page receives them
const RESULTS_JSON: &str = r#"{
    "hasRealData": true,
    "flights": [
        {
            "id": "outbound_1",
            "airline": "Delta Airlines",
            "flightNumber": "DL1234",
            "departureAirport": "LAX",
            "arrivalAirport": "JFK",
            "departureTime": "08:15",
            "arrivalTime": "16:45",
            "departureDate": "2025-08-15",
            "duration": "5h 30m",
            "price": 300,
            "stops": 0
        },
        {
            "id": "outbound_2",
            "airline": "UA",
            "flightNumber": "UA88",
            "departureAirport": "LAX",
            "arrivalAirport": "JFK",
            "departureTime": "2025-08-15T10:00:00",
            "arrivalTime": "2025-08-15T19:30:00",
            "departureDate": "2025-08-15",
            "duration": "PT6H30M",
            "price": 250,
            "currency": "USD",
            "stops": 1
        },
        {
            "id": "outbound_3",
            "airline": "JetBlue",
            "flightNumber": "B6 415",
            "duration": "PT9H",
            "price": 180,
            "stops": 2
        }
    ]
}"#;

/// Helper function to create a minimal flight
fn create_flight(id: &str, price: f64, duration: &str) -> Flight {
    Flight {
        id: Some(id.to_string()),
        airline: "Test Air".to_string(),
        flight_number: id.to_uppercase(),
        duration: Some(duration.to_string()),
        price: Some(price),
        ..Default::default()
    }
}

#[test]
fn test_duration_examples() {
    assert_eq!(duration_hours(Some("2h 15m")), 2.25);
    assert_eq!(duration_hours(Some("PT2H15M")), 2.25);
    assert_eq!(duration_hours(None), 0.0);
    assert_eq!(duration_hours(Some("")), 0.0);
}

#[test]
fn test_convenience_boundaries() {
    assert!((convenience_score(Some(0)) - 0.8).abs() < 1e-9);
    assert!((convenience_score(Some(1)) - 0.4).abs() < 1e-9);
    assert!(convenience_score(Some(5)).abs() < 1e-9);
}

#[test]
fn test_normalized_prices() {
    let flights = vec![create_flight("a", 100.0, "1h"), create_flight("b", 200.0, "1h")];
    let normalized = normalize_flights(&flights);
    let prices: Vec<f64> = normalized.iter().map(|n| n.normalized.price).collect();
    assert_eq!(prices, vec![0.5, 0.0]);
}

#[test]
fn test_cheaper_but_slower_is_recommended() {
    let flights = vec![create_flight("a", 300.0, "5h"), create_flight("b", 250.0, "6h")];
    let normalized = normalize_flights(&flights);
    let summary = summarize(&normalized);

    let price = summary.insight(InsightKind::Price).unwrap();
    assert_eq!(price.label, "Test Air B");
    assert!(price.text.contains("$50"));

    let duration = summary.insight(InsightKind::Duration).unwrap();
    assert_eq!(duration.label, "Test Air A");
    assert!(duration.text.contains("1h 0m"));

    let recommendation = summary.recommendation.unwrap();
    assert_eq!(recommendation.flight.id.as_deref(), Some("b"));
    assert_eq!(recommendation.reason, RecommendationReason::LowerCost);
    assert_eq!(recommendation.reason.to_string(), "Lower cost");
}

#[test]
fn test_only_pairs_are_summarized() {
    let one = vec![create_flight("a", 300.0, "5h")];
    let three = vec![
        create_flight("a", 300.0, "5h"),
        create_flight("b", 250.0, "6h"),
        create_flight("c", 200.0, "7h"),
    ];
    for flights in [&one, &three] {
        let summary = summarize(&normalize_flights(flights));
        assert!(summary.insights.is_empty());
        assert!(summary.recommendation.is_none());
    }
}

#[test]
fn test_exact_tie_recommends_first() {
    let flights = vec![create_flight("a", 199.0, "PT3H"), create_flight("b", 199.0, "3h")];
    let summary = summarize(&normalize_flights(&flights));
    let recommendation = summary.recommendation.unwrap();
    assert_eq!(recommendation.index, 0);
    assert_eq!(recommendation.reason, RecommendationReason::LowerCost);
}

#[test]
fn test_selection_round_trips() {
    let flights = parse_flights(RESULTS_JSON).unwrap();
    let mut selection = SelectionStore::new();

    assert_eq!(selection.toggle(flights[0].clone()), ToggleOutcome::Added);
    assert_eq!(selection.toggle(flights[0].clone()), ToggleOutcome::Removed);
    assert!(selection.is_empty());

    selection.toggle(flights[1].clone());
    selection.toggle(flights[0].clone());
    let ids: Vec<_> = selection.all().iter().filter_map(|f| f.selection_id()).collect();
    assert_eq!(ids, vec!["outbound_2", "outbound_1"]);
    assert!(selection.is_selected("outbound_1"));
    assert!(!selection.is_selected("outbound_3"));

    selection.clear();
    assert!(selection.is_empty());
    assert!(!selection.is_selected("outbound_1"));
}

#[test]
fn test_results_page_flow() {
    let config = CompareConfig::default();
    let mut flights = parse_flights(RESULTS_JSON).unwrap();
    assert_eq!(flights.len(), 3);

    mark_best_deals(&mut flights, &config);
    assert!(flights.iter().all(|f| f.is_optimal));
    assert_eq!(flights[0].selection_id(), Some("outbound_3"));

    // User picks the Delta flight; it is compared against the first other result
    let selected = flights
        .iter()
        .find(|f| f.selection_id() == Some("outbound_1"))
        .unwrap();
    let pair = comparison_candidates(selected, &flights);
    let report = compare_flights(&pair, &Normalizer::new(&config));
    let recommendation = report.summary.recommendation.as_ref().unwrap();
    assert_eq!(recommendation.label, "JetBlue B6 415");
    assert_eq!(recommendation.reason, RecommendationReason::LowerCost);

    // Both the Delta and United flights end up in the itinerary
    let mut selection = SelectionStore::new();
    for flight in flights.iter().filter(|f| f.departure_airport == "LAX") {
        selection.toggle(flight.clone());
    }
    let itinerary = Itinerary::from_selection(&selection, &config);
    assert_eq!(itinerary.legs.len(), 2);
    assert_eq!(itinerary.totals.get("USD"), Some(&550.0));
    assert_eq!(itinerary.total_duration, "12h 0m");
    assert_eq!(itinerary.total_stops, 1);

    let leg = |id: &str| {
        itinerary
            .legs
            .iter()
            .find(|l| l.id.as_deref() == Some(id))
            .unwrap()
    };
    let delta = leg("outbound_1");
    assert_eq!(delta.label, "Delta Airlines DL1234");
    assert_eq!(delta.departure_time, "08:15");
    assert_eq!(delta.duration, "5h 30m");

    let united = leg("outbound_2");
    assert_eq!(united.label, "United Airlines UA88");
    assert_eq!(united.departure_time, "10:00 AM");
    assert_eq!(united.arrival_time, "07:30 PM");
    assert_eq!(united.duration, "6h 30m");
}

#[test]
fn test_custom_weights_change_value_score() {
    let flights = vec![create_flight("a", 100.0, "2h"), create_flight("b", 200.0, "2h")];

    let default_scores: Vec<f64> = normalize_flights(&flights)
        .iter()
        .map(|n| n.value_score)
        .collect();

    let config = CompareConfig {
        weights: ScoringWeights::new(0.0, 1.0).unwrap(),
        ..Default::default()
    };
    let convenience_only: Vec<f64> = Normalizer::new(&config)
        .normalize(&flights)
        .iter()
        .map(|n| n.value_score)
        .collect();

    assert!(default_scores[0] > default_scores[1]);
    // Same stop count, so convenience alone cannot separate them
    assert_eq!(convenience_only[0], convenience_only[1]);
}
