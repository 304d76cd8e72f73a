//! The lookups the enrichment layer depends on, behind one trait.

use std::future::Future;

use wanderlist_core::{AppConfig, Coordinates, FlightEstimate, ResolvedCity};

use crate::amadeus::AmadeusClient;
use crate::client::{ApiClient, HttpSettings};
use crate::error::GatewayError;
use crate::geocode::ReverseGeocoder;
use crate::token::{ClientCredentials, TokenManager};
use crate::unsplash::UnsplashClient;

/// External data lookups. Implementations convert every expected failure
/// into `None` or an empty list; none of these calls can error.
pub trait TravelGateway: Send + Sync {
    /// Top image for a free-text query.
    fn destination_image(&self, query: &str) -> impl Future<Output = Option<String>> + Send;

    /// 3-letter location code for a city name.
    fn city_code(&self, city: &str) -> impl Future<Output = Option<String>> + Send;

    /// Flight price estimate from `origin` to `destination` (a code or a city name).
    fn flight_estimates(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Option<FlightEstimate>> + Send;

    /// Names of nearby points of interest; empty on any failure.
    fn points_of_interest(&self, at: Coordinates) -> impl Future<Output = Vec<String>> + Send;

    fn city_from_coordinates(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Option<ResolvedCity>> + Send;
}

/// Endpoints, credentials and transport settings for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub amadeus_base_url: String,
    pub unsplash_base_url: String,
    pub geocode_base_url: String,
    pub geocode_language: String,
    pub amadeus_credentials: Option<ClientCredentials>,
    pub unsplash_access_key: Option<String>,
    pub http: HttpSettings,
}

impl GatewaySettings {
    /// Credentials are only used when both the id and the secret are present.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let amadeus_credentials = match (&config.amadeus_client_id, &config.amadeus_client_secret) {
            (Some(id), Some(secret)) => Some(ClientCredentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => None,
        };
        Self {
            amadeus_base_url: config.amadeus_base_url.clone(),
            unsplash_base_url: config.unsplash_base_url.clone(),
            geocode_base_url: config.geocode_base_url.clone(),
            geocode_language: config.geocode_language.clone(),
            amadeus_credentials,
            unsplash_access_key: config.unsplash_access_key.clone(),
            http: HttpSettings {
                timeout_secs: config.request_timeout_secs,
                user_agent: config.user_agent.clone(),
                max_retries: config.gateway_max_retries,
                backoff_base_ms: config.gateway_backoff_base_ms,
            },
        }
    }
}

/// Production [`TravelGateway`] over Amadeus, Unsplash and BigDataCloud.
#[derive(Debug)]
pub struct HttpGateway {
    amadeus: AmadeusClient,
    unsplash: UnsplashClient,
    geocoder: ReverseGeocoder,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built, or
    /// [`GatewayError::InvalidBaseUrl`] if any base URL does not parse.
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let client = settings.http.build_client()?;
        let amadeus_api = ApiClient::new(client.clone(), &settings.amadeus_base_url, &settings.http)?;
        let unsplash_api =
            ApiClient::new(client.clone(), &settings.unsplash_base_url, &settings.http)?;
        let geocode_api = ApiClient::new(client, &settings.geocode_base_url, &settings.http)?;

        let tokens = TokenManager::new(amadeus_api.clone(), settings.amadeus_credentials);
        Ok(Self {
            amadeus: AmadeusClient::new(amadeus_api, tokens),
            unsplash: UnsplashClient::new(unsplash_api, settings.unsplash_access_key),
            geocoder: ReverseGeocoder::new(geocode_api, settings.geocode_language),
        })
    }

    /// # Errors
    ///
    /// Same as [`HttpGateway::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::new(GatewaySettings::from_app_config(config))
    }

    #[must_use]
    pub fn amadeus(&self) -> &AmadeusClient {
        &self.amadeus
    }
}

impl TravelGateway for HttpGateway {
    async fn destination_image(&self, query: &str) -> Option<String> {
        self.unsplash.destination_image(query).await
    }

    async fn city_code(&self, city: &str) -> Option<String> {
        self.amadeus.city_code(city).await
    }

    async fn flight_estimates(&self, origin: &str, destination: &str) -> Option<FlightEstimate> {
        self.amadeus.flight_estimates(origin, destination).await
    }

    async fn points_of_interest(&self, at: Coordinates) -> Vec<String> {
        self.amadeus.points_of_interest(at.lat, at.lng).await
    }

    async fn city_from_coordinates(&self, at: Coordinates) -> Option<ResolvedCity> {
        self.geocoder.city_from_coordinates(at.lat, at.lng).await
    }
}
