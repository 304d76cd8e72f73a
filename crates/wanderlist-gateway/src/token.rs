//! OAuth2 client-credentials token cache for the Amadeus API.

use std::time::Duration;

use reqwest::Url;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::client::ApiClient;
use crate::error::GatewayError;
use crate::types::TokenResponse;

const TOKEN_PATH: &str = "v1/security/oauth2/token";

/// Tokens are treated as expired this long before the provider says so.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Amadeus application credentials.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Obtains and caches the bearer token used by every Amadeus call.
///
/// The cache sits behind an async mutex, so concurrent callers wait for a
/// single refresh instead of each exchanging credentials.
pub struct TokenManager {
    api: ApiClient,
    token_url: Url,
    credentials: Option<ClientCredentials>,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_url", &self.token_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub(crate) fn new(api: ApiClient, credentials: Option<ClientCredentials>) -> Self {
        let token_url = api.endpoint(TOKEN_PATH, &[]);
        Self {
            api,
            token_url,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging credentials when the cached
    /// one is missing or expired.
    ///
    /// `None` means the authenticated features are unavailable for this call:
    /// credentials are not configured or the exchange failed. Callers skip,
    /// they never fail on it.
    pub async fn get_token(&self) -> Option<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Some(token.value.clone());
            }
        }

        let Some(credentials) = &self.credentials else {
            tracing::warn!("Amadeus credentials missing; flight and POI lookups disabled");
            return None;
        };

        let issued_at = Instant::now();
        match self.exchange(credentials).await {
            Ok(response) => {
                let lifetime = response.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
                tracing::debug!(lifetime_secs = lifetime, "Amadeus token refreshed");
                *cached = Some(CachedToken {
                    value: response.access_token.clone(),
                    expires_at: issued_at + Duration::from_secs(lifetime),
                });
                Some(response.access_token)
            }
            Err(e) => {
                tracing::error!(error = %e, "Amadeus token exchange failed");
                None
            }
        }
    }

    async fn exchange(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<TokenResponse, GatewayError> {
        self.api
            .post_form(
                &self.token_url,
                &[
                    ("grant_type", "client_credentials"),
                    ("client_id", credentials.client_id.as_str()),
                    ("client_secret", credentials.client_secret.as_str()),
                ],
            )
            .await
    }
}
