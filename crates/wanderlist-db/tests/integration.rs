//! Offline tests for wanderlist-db pool configuration and row mapping.
//! These tests do not require a live database connection.

use chrono::Utc;
use uuid::Uuid;
use wanderlist_core::{AppConfig, Environment, Place};
use wanderlist_db::{PoolConfig, VoyageRow};

fn app_config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        database_url: Some("postgres://example".to_string()),
        amadeus_client_id: None,
        amadeus_client_secret: None,
        unsplash_access_key: None,
        amadeus_base_url: "https://test.api.amadeus.com".to_string(),
        unsplash_base_url: "https://api.unsplash.com".to_string(),
        geocode_base_url: "https://api.bigdatacloud.net".to_string(),
        geocode_language: "fr".to_string(),
        default_departure: "PAR".to_string(),
        request_timeout_secs: 10,
        user_agent: "ua".to_string(),
        gateway_max_retries: 1,
        gateway_backoff_base_ms: 500,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`VoyageRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn voyage_row_has_expected_fields() {
    let id = Uuid::new_v4();
    let row = VoyageRow {
        id,
        name: "Reykjavik".to_string(),
        country: "Iceland".to_string(),
        city_code: "REK".to_string(),
        lat: 64.1466,
        lng: -21.9426,
        short_description: "Northern lights".to_string(),
        image_url: None,
        created_at: Utc::now(),
    };

    let place = Place::from(row);
    assert_eq!(place.id, id.to_string());
    assert_eq!(place.name, "Reykjavik");
    assert_eq!(place.flight_destination(), "REK");
    assert!(place.image_url.is_none());
    assert!(place.best_months.is_empty());
}
