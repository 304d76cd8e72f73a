//! Shared HTTP plumbing for every provider client.
//!
//! Wraps `reqwest` with base-URL normalisation, per-request auth, status
//! classification and retry. Provider clients only describe endpoints and
//! response shapes.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;
use crate::retry::retry_with_backoff;

/// Transport settings shared by all provider clients.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure, transient errors only.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "wanderlist/0.1 (travel-wishlist)".to_string(),
            max_retries: 1,
            backoff_base_ms: 500,
        }
    }
}

impl HttpSettings {
    /// Builds the `reqwest::Client` with request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the client cannot be constructed.
    pub fn build_client(&self) -> Result<Client, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.timeout_secs.min(10)))
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}

/// How a request authenticates.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    Anonymous,
    Bearer(&'a str),
    /// Unsplash's `Authorization: Client-ID <key>` scheme.
    ClientId(&'a str),
}

impl Auth<'_> {
    fn apply(self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::Anonymous => request,
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::ClientId(key) => {
                request.header(reqwest::header::AUTHORIZATION, format!("Client-ID {key}"))
            }
        }
    }
}

/// One provider's base URL plus the shared client and retry policy.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if `base_url` does not parse.
    pub(crate) fn new(
        client: Client,
        base_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, GatewayError> {
        // Normalise: ensure the base URL ends with exactly one slash so that
        // `Url::join` appends endpoint paths instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Builds `{base}/{path}?{params}` with percent-encoded query values.
    pub(crate) fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone());
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// GETs `url` and deserializes the JSON body, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::RateLimited`] on HTTP 429 once retries are exhausted.
    /// - [`GatewayError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`GatewayError::Http`] on network failure or timeout.
    /// - [`GatewayError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        auth: Auth<'_>,
    ) -> Result<T, GatewayError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let request = auth.apply(self.client.get(url.clone()));
            let response = request.send().await?;
            Self::read_json(response, url).await
        })
        .await
    }

    /// POSTs a form-encoded body to `url` and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get_json`].
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self.client.post(url.clone()).form(form).send().await?;
            Self::read_json(response, url).await
        })
        .await
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        url: &Url,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(GatewayError::RateLimited {
                url: redact_query(url),
                retry_after_secs,
            });
        }
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_query(url),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: redact_query(url),
            source: e,
        })
    }
}

/// Path only; query strings may carry user input and are kept out of logs.
fn redact_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> ApiClient {
        let settings = HttpSettings::default();
        let client = settings.build_client().expect("client construction should not fail");
        ApiClient::new(client, base_url, &settings).expect("base URL should parse")
    }

    #[test]
    fn endpoint_constructs_path_and_query() {
        let client = test_client("https://test.api.amadeus.com");
        let url = client.endpoint(
            "v1/shopping/activities",
            &[("latitude", "38.7"), ("longitude", "-9.1"), ("radius", "10")],
        );
        assert_eq!(
            url.as_str(),
            "https://test.api.amadeus.com/v1/shopping/activities?latitude=38.7&longitude=-9.1&radius=10"
        );
    }

    #[test]
    fn endpoint_strips_trailing_and_leading_slashes() {
        let client = test_client("https://api.unsplash.com/");
        let url = client.endpoint("/search/photos", &[("query", "Lisbon")]);
        assert_eq!(
            url.as_str(),
            "https://api.unsplash.com/search/photos?query=Lisbon"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = test_client("http://127.0.0.1:9999/mock");
        let url = client.endpoint("data/reverse-geocode-client", &[]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/mock/data/reverse-geocode-client"
        );
    }

    #[test]
    fn endpoint_encodes_special_characters() {
        let client = test_client("https://api.unsplash.com");
        let url = client.endpoint("search/photos", &[("query", "São Paulo & co landmark")]);
        assert!(
            url.as_str().contains("S%C3%A3o+Paulo+%26+co+landmark"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let settings = HttpSettings::default();
        let client = settings.build_client().unwrap();
        let result = ApiClient::new(client, "not a url", &settings);
        assert!(matches!(result, Err(GatewayError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn redact_query_drops_parameters() {
        let url = Url::parse("https://api.test/v1/x?keyword=secret").unwrap();
        assert_eq!(redact_query(&url), "https://api.test/v1/x");
    }
}
