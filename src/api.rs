//! Typed data loaders for the RenderLab demo pages.
//!
//! Centralizes the fetch policy the pages share: 10 s deadline, two
//! retries, 300 ms base backoff.

use crate::{FetchClient, FetchOptions, Post, Result, User};

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// JSONPlaceholder wrapper behind the demo page loaders.
#[derive(Clone, Debug)]
pub struct PlaceholderApi {
    client: FetchClient,
    base_url: String,
}

impl PlaceholderApi {
    /// Creates a wrapper against the public JSONPlaceholder service.
    pub fn new() -> Self {
        let options = FetchOptions {
            timeout_ms: 10_000,
            max_retries: 2,
            retry_base_ms: 300,
        };
        Self {
            client: FetchClient::new().with_options(options),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Points the wrapper at a different service, e.g. a test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches up to `limit` posts.
    pub async fn posts(&self, limit: usize) -> Result<Vec<Post>> {
        let url = format!("{}/posts?_limit={limit}", self.base_url);
        self.client.fetch_json(&url).await
    }

    /// Fetches all users.
    pub async fn users(&self) -> Result<Vec<User>> {
        let url = format!("{}/users", self.base_url);
        self.client.fetch_json(&url).await
    }
}

impl Default for PlaceholderApi {
    fn default() -> Self {
        Self::new()
    }
}
