// src/mcp_server.rs

use anyhow::Result;
use flight_compare::ranking::{mark_best_deals, rank_by_travel_cost};
use flight_compare::{
    compare_flights, comparison_candidates, CompareConfig, Flight, Itinerary, Normalizer,
    SelectionStore,
};
use rmcp::{
    model::{ServerCapabilities, ServerInfo},
    schemars, tool,
    transport::stdio,
    ServerHandler, ServiceExt,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CONFIG_ENV: &str = "FLIGHT_COMPARE_CONFIG";

/// Flight comparison MCP server. One selection store per server session.
#[derive(Clone)]
pub struct CompareServer {
    config: Arc<CompareConfig>,
    selection: Arc<Mutex<SelectionStore>>,
}

impl CompareServer {
    pub fn new(config: CompareConfig) -> Self {
        Self {
            config: Arc::new(config),
            selection: Arc::new(Mutex::new(SelectionStore::new())),
        }
    }

    /// Initialize logging to file
    fn init_logging() -> Result<()> {
        let log_dir = PathBuf::from("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, "flight-compare-mcp.log");

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("info").add_directive("flight_compare=debug".parse()?),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json(),
            )
            .init();

        info!("Logging initialized - logs will be written to logs/flight-compare-mcp.log.*");
        Ok(())
    }

    fn load_config() -> CompareConfig {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => match CompareConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    error!(path = %path, error = %e, "Invalid config, falling back to defaults");
                    CompareConfig::default()
                }
            },
            Err(_) => CompareConfig::default(),
        }
    }

    fn selection(&self) -> MutexGuard<'_, SelectionStore> {
        // Store mutations are single Vec operations, so a poisoned store is still consistent
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn normalizer(&self) -> Normalizer {
        Normalizer::new(&self.config)
    }

    fn handle_compare(&self, params: CompareParams) -> Value {
        let flights: Vec<Flight> = params.flights.into_iter().map(Flight::from).collect();

        let candidates = match params.selected_id.as_deref() {
            Some(id) => match flights.iter().find(|f| f.selection_id() == Some(id.trim())) {
                Some(selected) => comparison_candidates(selected, &flights),
                None => {
                    warn!(selected_id = id, "Selected flight not in candidate list");
                    return json!({ "error": format!("Flight not found: {}", id) });
                }
            },
            None => flights,
        };

        compare_candidates(&candidates, &self.normalizer())
    }

    fn handle_toggle(&self, params: ToggleParams) -> Value {
        let flight = Flight::from(params.flight);
        let id = flight.selection_id().map(str::to_string);
        let mut selection = self.selection();
        let outcome = selection.toggle(flight);
        info!(id = id.as_deref(), outcome = ?outcome, "Selection toggled");
        json!({
            "outcome": outcome,
            "id": id,
            "selected_ids": selected_ids(&selection),
        })
    }

    fn handle_clear(&self) -> Value {
        let mut selection = self.selection();
        let cleared = selection.len();
        selection.clear();
        info!(cleared, "Selection cleared");
        json!({ "cleared": cleared })
    }

    fn handle_list(&self) -> Value {
        let selection = self.selection();
        json!({
            "count": selection.len(),
            "flights": selection.all(),
        })
    }

    fn handle_compare_selection(&self) -> Value {
        let selected = self.selection().all().to_vec();
        compare_candidates(&selected, &self.normalizer())
    }

    fn handle_itinerary(&self) -> Value {
        let itinerary = Itinerary::from_selection(&self.selection(), &self.config);
        if itinerary.is_empty() {
            return json!({
                "itinerary": itinerary,
                "message": "No flights selected yet. Use toggle_selection to add flights."
            });
        }
        json!({ "itinerary": itinerary })
    }

    fn handle_rank(&self, params: RankParams) -> Value {
        let mut flights: Vec<Flight> = params.flights.into_iter().map(Flight::from).collect();
        mark_best_deals(&mut flights, &self.config);
        if params.by_travel_cost.unwrap_or(false) {
            rank_by_travel_cost(&mut flights);
        }
        if let Some(limit) = params.max_flights {
            flights.truncate(limit);
        }
        json!({ "total_flights": flights.len(), "flights": flights })
    }
}

/// Flight record supplied by the client
#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct FlightParam {
    #[schemars(description = "Unique flight id within the result set")]
    pub id: Option<String>,
    #[schemars(description = "Airline name (e.g., Delta Airlines)")]
    pub airline: Option<String>,
    #[schemars(description = "Flight number (e.g., DL1234)")]
    pub flight_number: Option<String>,
    #[schemars(description = "Departure airport code (e.g., LAX)")]
    pub departure_airport: Option<String>,
    #[schemars(description = "Arrival airport code (e.g., JFK)")]
    pub arrival_airport: Option<String>,
    #[schemars(description = "Departure time as shown to the user")]
    pub departure_time: Option<String>,
    #[schemars(description = "Arrival time as shown to the user")]
    pub arrival_time: Option<String>,
    #[schemars(description = "Departure date in YYYY-MM-DD format")]
    pub departure_date: Option<String>,
    #[schemars(description = "Arrival date in YYYY-MM-DD format")]
    pub arrival_date: Option<String>,
    #[schemars(description = "Duration, either ISO-8601 (PT5H30M) or human readable (5h 30m)")]
    pub duration: Option<String>,
    #[schemars(description = "Total price")]
    pub price: Option<f64>,
    #[schemars(description = "Currency code (default: USD)")]
    pub currency: Option<String>,
    #[schemars(description = "Number of stops (0 for non-stop)")]
    pub stops: Option<u32>,
    #[schemars(description = "Booking link")]
    pub booking_link: Option<String>,
    #[schemars(description = "Cabin class (e.g., economy)")]
    pub cabin_class: Option<String>,
}

impl From<FlightParam> for Flight {
    fn from(param: FlightParam) -> Self {
        Flight {
            id: param.id,
            airline: param.airline.unwrap_or_default(),
            flight_number: param.flight_number.unwrap_or_default(),
            departure_airport: param.departure_airport.unwrap_or_default(),
            arrival_airport: param.arrival_airport.unwrap_or_default(),
            departure_time: param.departure_time.unwrap_or_default(),
            arrival_time: param.arrival_time.unwrap_or_default(),
            departure_date: param.departure_date,
            arrival_date: param.arrival_date,
            duration: param.duration,
            price: param.price,
            currency: param.currency,
            stops: param.stops,
            booking_link: param.booking_link,
            cabin_class: param.cabin_class,
            is_optimal: false,
        }
    }
}

/// Comparison request parameters
#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct CompareParams {
    #[schemars(description = "Candidate flights. Exactly two are compared; with selected_id the list is cut to the selected flight plus the first alternative")]
    pub flights: Vec<FlightParam>,
    #[schemars(description = "Id of the flight the user selected")]
    pub selected_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct ToggleParams {
    #[schemars(description = "Flight to add to or remove from the selection")]
    pub flight: FlightParam,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct RankParams {
    #[schemars(description = "Flights to rank")]
    pub flights: Vec<FlightParam>,
    #[schemars(description = "Rank by price plus time and stop penalties instead of price alone")]
    pub by_travel_cost: Option<bool>,
    #[schemars(description = "Maximum number of flights to return")]
    pub max_flights: Option<usize>,
}

fn selected_ids(selection: &SelectionStore) -> Vec<String> {
    selection
        .all()
        .iter()
        .filter_map(|f| f.selection_id().map(str::to_string))
        .collect()
}

fn compare_candidates(candidates: &[Flight], normalizer: &Normalizer) -> Value {
    let report = compare_flights(candidates, normalizer);
    debug!(
        candidates = candidates.len(),
        insights = report.summary.insights.len(),
        "Comparison computed"
    );

    let mut value = match serde_json::to_value(&report) {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to serialize comparison: {}", e);
            return json!({ "error": format!("Failed to serialize comparison: {}", e) });
        }
    };
    if report.summary.is_empty() {
        value["message"] = json!(format!(
            "Comparison needs exactly two flights, got {}.",
            candidates.len()
        ));
    }
    value
}

fn to_response(value: Value) -> String {
    serde_json::to_string_pretty(&value)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize results: {}"}}"#, e))
}

#[tool(tool_box)]
impl CompareServer {
    #[tool(description = "Compare two flights: normalized price, duration, stops and convenience, plus price/duration insights and a recommendation. Pass exactly two flights, or a list plus selected_id.")]
    async fn compare_flights(&self, #[tool(aggr)] params: CompareParams) -> String {
        info!(
            flights = params.flights.len(),
            selected_id = params.selected_id.as_deref(),
            "Comparison request received"
        );
        to_response(self.handle_compare(params))
    }

    #[tool(description = "Add a flight to the session selection, or remove it if it is already selected")]
    async fn toggle_selection(&self, #[tool(aggr)] params: ToggleParams) -> String {
        to_response(self.handle_toggle(params))
    }

    #[tool(description = "Remove every flight from the session selection")]
    async fn clear_selection(&self) -> String {
        to_response(self.handle_clear())
    }

    #[tool(description = "List the selected flights in the order they were selected")]
    async fn list_selection(&self) -> String {
        to_response(self.handle_list())
    }

    #[tool(description = "Compare the selected flights. Needs exactly two selected flights.")]
    async fn compare_selection(&self) -> String {
        to_response(self.handle_compare_selection())
    }

    #[tool(description = "Build an itinerary with a cost summary from the selected flights")]
    async fn build_itinerary(&self) -> String {
        to_response(self.handle_itinerary())
    }

    #[tool(description = "Sort flights by price and flag the best deals")]
    async fn rank_flights(&self, #[tool(aggr)] params: RankParams) -> String {
        info!(flights = params.flights.len(), "Ranking request received");
        to_response(self.handle_rank(params))
    }
}

#[tool(tool_box)]
impl ServerHandler for CompareServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("A flight comparison server. Compares pairs of flights with normalized metrics and a recommendation, keeps a per-session selection of flights, and builds itineraries with cost summaries.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = CompareServer::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting MCP flight comparison server");

    let server = CompareServer::new(CompareServer::load_config());
    let transport = stdio();

    let service = server.serve(transport).await?;
    info!("MCP service started, waiting for requests");

    service.waiting().await?;

    info!("MCP service shutting down");
    Ok(())
}
