#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// `None` selects the in-memory place store.
    pub database_url: Option<String>,
    pub amadeus_client_id: Option<String>,
    pub amadeus_client_secret: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub amadeus_base_url: String,
    pub unsplash_base_url: String,
    pub geocode_base_url: String,
    pub geocode_language: String,
    pub default_departure: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub gateway_max_retries: u32,
    pub gateway_backoff_base_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field(
                "amadeus_client_id",
                &self.amadeus_client_id.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "amadeus_client_secret",
                &self.amadeus_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "unsplash_access_key",
                &self.unsplash_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field("amadeus_base_url", &self.amadeus_base_url)
            .field("unsplash_base_url", &self.unsplash_base_url)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("geocode_language", &self.geocode_language)
            .field("default_departure", &self.default_departure)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("gateway_max_retries", &self.gateway_max_retries)
            .field("gateway_backoff_base_ms", &self.gateway_backoff_base_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
