use crate::app_config::{AppConfig, Environment};
use crate::place::departure_code;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every provider credential is optional: a missing key degrades the matching
/// enrichment instead of failing startup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings in a .env file count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("WANDERLIST_ENV", "development"))?;
    let log_level = or_default("WANDERLIST_LOG_LEVEL", "info");
    let database_url = optional("DATABASE_URL");

    let amadeus_client_id = optional("AMADEUS_CLIENT_ID");
    let amadeus_client_secret = optional("AMADEUS_CLIENT_SECRET");
    let unsplash_access_key = optional("UNSPLASH_ACCESS_KEY");

    let amadeus_base_url = or_default("WANDERLIST_AMADEUS_BASE_URL", "https://test.api.amadeus.com");
    let unsplash_base_url = or_default("WANDERLIST_UNSPLASH_BASE_URL", "https://api.unsplash.com");
    let geocode_base_url = or_default("WANDERLIST_GEOCODE_BASE_URL", "https://api.bigdatacloud.net");
    let geocode_language = or_default("WANDERLIST_GEOCODE_LANGUAGE", "fr");
    let default_departure = parse_departure(&or_default("WANDERLIST_DEFAULT_DEPARTURE", "PAR"))?;

    let request_timeout_secs = parse_u64("WANDERLIST_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("WANDERLIST_USER_AGENT", "wanderlist/0.1 (travel-wishlist)");
    let gateway_max_retries = parse_u32("WANDERLIST_GATEWAY_MAX_RETRIES", "1")?;
    let gateway_backoff_base_ms = parse_u64("WANDERLIST_GATEWAY_BACKOFF_BASE_MS", "500")?;

    let db_max_connections = parse_u32("WANDERLIST_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("WANDERLIST_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("WANDERLIST_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        database_url,
        amadeus_client_id,
        amadeus_client_secret,
        unsplash_access_key,
        amadeus_base_url,
        unsplash_base_url,
        geocode_base_url,
        geocode_language,
        default_departure,
        request_timeout_secs,
        user_agent,
        gateway_max_retries,
        gateway_backoff_base_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WANDERLIST_ENV".to_string(),
            reason: format!("expected development, test or production, got {other:?}"),
        }),
    }
}

fn parse_departure(s: &str) -> Result<String, ConfigError> {
    departure_code(s).ok_or_else(|| ConfigError::InvalidEnvVar {
        var: "WANDERLIST_DEFAULT_DEPARTURE".to_string(),
        reason: format!("expected a 3-letter code, got {s:?}"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
