//! Unsplash photo search.

use crate::client::{ApiClient, Auth};
use crate::types::PhotoSearchResponse;

const SEARCH_PATH: &str = "search/photos";

/// Returned instead of a search result when no access key is configured.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1?auto=format&fit=crop&w=1200&q=80";

#[derive(Debug)]
pub struct UnsplashClient {
    api: ApiClient,
    access_key: Option<String>,
}

impl UnsplashClient {
    pub(crate) fn new(api: ApiClient, access_key: Option<String>) -> Self {
        Self { api, access_key }
    }

    /// URL of the top landscape photo for `query`.
    ///
    /// Without an access key this is degraded mode, not an error: the
    /// placeholder URL is returned and no request is made. `None` when the
    /// search fails or finds nothing.
    pub async fn destination_image(&self, query: &str) -> Option<String> {
        let Some(key) = self.access_key.as_deref() else {
            return Some(PLACEHOLDER_IMAGE_URL.to_string());
        };

        let url = self.api.endpoint(
            SEARCH_PATH,
            &[
                ("query", query),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ],
        );
        match self
            .api
            .get_json::<PhotoSearchResponse>(&url, Auth::ClientId(key))
            .await
        {
            Ok(response) => response.results.into_iter().next().and_then(|p| p.urls.regular),
            Err(e) => {
                tracing::error!(query, error = %e, "image search failed");
                None
            }
        }
    }
}
