//! Domain model, persistence port and configuration shared by every
//! wanderlist crate.

mod app_config;
mod config;
pub mod place;
pub mod repository;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use place::{
    departure_code, Coordinates, FlightEstimate, FlightQuote, NewPlace, Place, ResolvedCity, ViewMode,
    MAX_POINTS_OF_INTEREST, TEMP_PLACE_ID,
};
pub use repository::{PlaceRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
