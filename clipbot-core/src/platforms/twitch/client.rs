// File: clipbot-core/src/platforms/twitch/client.rs

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::Error;
use crate::http::HttpClient;

pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";
pub const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Application credentials and endpoints for Helix.
#[derive(Debug, Clone)]
pub struct HelixConfig {
    pub client_id: String,
    pub client_secret: String,
    pub helix_url: String,
    pub auth_url: String,
}

impl HelixConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            helix_url: DEFAULT_HELIX_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
        }
    }
}

/// Entry point for every Helix call the bot makes.
///
/// Construct it, call [`provision_token`](Self::provision_token) once, then
/// share it behind an `Arc`; after provisioning it is only read.
pub struct TwitchHelixClient {
    http: Arc<dyn HttpClient>,
    config: HelixConfig,
    bearer_token: Option<String>,
}

impl TwitchHelixClient {
    pub fn new(config: HelixConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            config,
            bearer_token: None,
        }
    }

    /// Use an already issued app token instead of provisioning one.
    pub fn with_token(mut self, bearer_token: impl Into<String>) -> Self {
        self.bearer_token = Some(bearer_token.into());
        self
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    pub(crate) fn http_client(&self) -> Arc<dyn HttpClient> {
        self.http.clone()
    }

    pub(crate) fn set_bearer_token(&mut self, token: String) {
        self.bearer_token = Some(token);
    }

    /// `Client-Id` and `Authorization` headers for a Helix request.
    pub fn auth_headers(&self) -> Result<HashMap<String, String>, Error> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or_else(|| Error::Auth("no app access token; call provision_token first".into()))?;

        let mut headers = HashMap::new();
        headers.insert("Client-Id".to_string(), self.config.client_id.clone());
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        Ok(headers)
    }

    /// `{helix_url}/{path}?k=v&...`, keeping the parameter order given.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.config.helix_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET a Helix path and decode the JSON body.
    pub(crate) async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path, params)?;
        let headers = self.auth_headers()?;
        let body = self.http.get(url.to_string(), headers).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
