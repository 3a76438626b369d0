//! HTTP client abstraction for the Twitch integrations.
//!
//! Helix and the OAuth token endpoint are only ever reached through
//! [`HttpClient`], so tests can swap in a mock and assert on the exact URLs
//! and headers without any network access. The default implementation wraps
//! reqwest.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

use crate::Error;

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with the given headers, returning the response body.
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error>;

    /// POST `form` as `application/x-www-form-urlencoded` to `url`.
    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<String, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn read_body(response: reqwest::Response) -> Result<String, Error> {
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            warn!("HTTP request failed => status={} body={}", status, body_text);
            return Err(Error::Platform(format!("HTTP {} => {}", status, body_text)));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        Self::read_body(response).await
    }

    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<String, Error> {
        let response = self.client.post(&url).form(&form).send().await?;
        Self::read_body(response).await
    }
}
