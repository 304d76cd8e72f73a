mod commands;
mod render;
mod repository;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use wanderlist_core::{departure_code, Coordinates, ViewMode};
use wanderlist_enrich::WishlistSession;
use wanderlist_gateway::HttpGateway;

use crate::repository::CliRepository;

#[derive(Debug, Parser)]
#[command(name = "wanderlist")]
#[command(about = "Travel wishlist with live photos, sights and flight prices")]
struct Cli {
    /// Departure airport or city code used for flight prices (defaults to
    /// `WANDERLIST_DEFAULT_DEPARTURE`)
    #[arg(long, global = true, value_parser = parse_departure)]
    departure: Option<String>,

    /// Layout of the destination list
    #[arg(long, global = true, value_enum, default_value_t = ViewArg::List)]
    view: ViewArg,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Start from a few sample destinations when no database is configured
    #[arg(long, global = true)]
    seed_demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List wishlist destinations
    List,
    /// Show one destination with its photo, sights and flight price
    Show {
        /// Place id or name
        place: String,
    },
    /// Add the city found at a coordinate pair
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete a destination
    Delete {
        /// Place id or name
        place: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Reverse-geocode a coordinate pair
    Geocode {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Price one route
    Flights {
        /// Departure code
        #[arg(long, value_parser = parse_departure)]
        from: String,
        /// Destination code or city name
        #[arg(long)]
        to: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Map,
    List,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Map => ViewMode::Map,
            ViewArg::List => ViewMode::List,
        }
    }
}

fn parse_departure(s: &str) -> Result<String, String> {
    departure_code(s).ok_or_else(|| format!("'{s}' is not a three-letter code"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = wanderlist_core::load_app_config()?;

    // stdout carries command output (and --json); logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let gateway = Arc::new(
        HttpGateway::from_app_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP gateway: {e}"))?,
    );

    match cli.command {
        Some(Commands::Geocode { lat, lng }) => {
            commands::run_geocode(&gateway, Coordinates { lat, lng }, cli.json).await
        }
        Some(Commands::Flights { from, to }) => {
            commands::run_flights(&gateway, &from, &to, cli.json).await
        }
        command => {
            let repository = CliRepository::from_config(&config, cli.seed_demo).await?;
            tracing::debug!(backend = repository.backend_name(), "repository ready");

            let departure = cli
                .departure
                .unwrap_or_else(|| config.default_departure.clone());
            let mut session = WishlistSession::new(Arc::clone(&gateway), repository, departure);
            session.on_view_mode_change(cli.view.into());

            match command {
                Some(Commands::Show { place }) => {
                    commands::run_show(&mut session, &place, cli.json).await
                }
                Some(Commands::Add { lat, lng, yes }) => {
                    commands::run_add(&mut session, Coordinates { lat, lng }, yes, cli.json).await
                }
                Some(Commands::Delete { place, yes }) => {
                    commands::run_delete(&mut session, &place, yes).await
                }
                _ => commands::run_list(&mut session, cli.json).await,
            }
        }
    }
}

#[cfg(test)]
mod tests;
