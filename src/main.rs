//! CLI interface for flight-compare

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flight_compare::ranking::{mark_best_deals, rank_by_travel_cost};
use flight_compare::{
    compare_flights, comparison_candidates, load_flights, CompareConfig, CompareError, Flight,
    Itinerary, Normalizer, ScoringWeights, SelectionStore, ToggleOutcome,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flight-compare")]
#[command(about = "Compare, score and shortlist flight search results")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// JSON file with flight results (array, or object with a `flights` array)
    #[arg(short, long)]
    input: PathBuf,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Currency assumed for flights without one
    #[arg(long)]
    currency: Option<String>,
    /// Price weight of the value score (paired with --convenience-weight)
    #[arg(long, requires = "convenience_weight")]
    price_weight: Option<f64>,
    /// Convenience weight of the value score
    #[arg(long, requires = "price_weight")]
    convenience_weight: Option<f64>,
    /// Output file for JSON results
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a selected flight against one alternative
    Compare {
        #[command(flatten)]
        common: CommonArgs,
        /// Id of the selected flight; without it the whole input is compared
        #[arg(short, long)]
        selected: Option<String>,
        /// Id of the alternative; defaults to the first other flight
        #[arg(short, long, requires = "selected")]
        alternative: Option<String>,
    },
    /// Print normalized metrics for every flight
    Normalize {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Build an itinerary with a cost summary from selected flight ids
    Itinerary {
        #[command(flatten)]
        common: CommonArgs,
        /// Flight ids to select, in travel order (comma-separated)
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },
    /// Sort by price and flag the best deals
    Deals {
        #[command(flatten)]
        common: CommonArgs,
        /// Rank by price plus time and stop penalties instead of price alone
        #[arg(long)]
        by_travel_cost: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(common: &CommonArgs) -> Result<CompareConfig, CompareError> {
    let mut config = match &common.config {
        Some(path) => CompareConfig::from_file(path)?,
        None => CompareConfig::default(),
    };
    if let Some(currency) = &common.currency {
        config.default_currency = currency.clone();
    }
    if let (Some(price), Some(convenience)) = (common.price_weight, common.convenience_weight) {
        config.weights = ScoringWeights::new(price, convenience)?;
    }
    config.validate()
}

fn find_flight<'a>(flights: &'a [Flight], id: &str) -> Result<&'a Flight, CompareError> {
    flights
        .iter()
        .find(|f| f.selection_id() == Some(id.trim()))
        .ok_or_else(|| CompareError::FlightNotFound(id.to_string()))
}

fn write_output<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("writing results to {}", path.display()))?;
            eprintln!("Results saved to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare {
            common,
            selected,
            alternative,
        } => {
            let config = load_config(&common)?;
            let flights = load_flights(&common.input)?;
            info!(flights = flights.len(), "Loaded flights");

            let candidates = match (selected, alternative) {
                (Some(selected), Some(alternative)) => vec![
                    find_flight(&flights, &selected)?.clone(),
                    find_flight(&flights, &alternative)?.clone(),
                ],
                (Some(selected), None) => {
                    comparison_candidates(find_flight(&flights, &selected)?, &flights)
                }
                (None, _) => flights,
            };
            if candidates.len() != 2 {
                warn!(
                    count = candidates.len(),
                    "Comparison needs exactly two flights; no insights will be produced"
                );
            }

            let report = compare_flights(&candidates, &Normalizer::new(&config));
            if let Some(recommendation) = &report.summary.recommendation {
                eprintln!("Recommended: {} ({})", recommendation.label, recommendation.reason);
            }
            write_output(&report, common.output.as_ref())
        }
        Commands::Normalize { common } => {
            let config = load_config(&common)?;
            let flights = load_flights(&common.input)?;
            let normalized = Normalizer::new(&config).normalize(&flights);
            write_output(&normalized, common.output.as_ref())
        }
        Commands::Itinerary { common, select } => {
            let config = load_config(&common)?;
            let flights = load_flights(&common.input)?;
            if select.is_empty() {
                bail!("at least one flight id must be given with --select");
            }

            let mut selection = SelectionStore::new();
            for id in &select {
                let flight = find_flight(&flights, id)?.clone();
                if selection.toggle(flight) == ToggleOutcome::Removed {
                    debug!(id = %id, "Flight listed twice, deselected");
                }
            }

            let itinerary = Itinerary::from_selection(&selection, &config);
            eprintln!(
                "Itinerary: {} legs, total {}",
                itinerary.legs.len(),
                itinerary.formatted_totals.join(" + ")
            );
            write_output(&itinerary, common.output.as_ref())
        }
        Commands::Deals {
            common,
            by_travel_cost,
        } => {
            let config = load_config(&common)?;
            let mut flights = load_flights(&common.input)?;
            mark_best_deals(&mut flights, &config);
            if by_travel_cost {
                rank_by_travel_cost(&mut flights);
            }
            write_output(&flights, common.output.as_ref())
        }
    }
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
