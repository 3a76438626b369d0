// App access token via the OAuth client-credentials grant.
//
// Done once at startup; the token is not refreshed on expiry.

use serde::Deserialize;
use tracing::{debug, info};

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from `POST https://id.twitch.tv/oauth2/token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

impl TwitchHelixClient {
    /// Exchanges the client id/secret for an app access token and keeps it
    /// for every later Helix request.
    pub async fn provision_token(&mut self) -> Result<(), Error> {
        let form = vec![
            ("client_id".to_string(), self.config().client_id.clone()),
            ("client_secret".to_string(), self.config().client_secret.clone()),
            ("grant_type".to_string(), "client_credentials".to_string()),
        ];
        let auth_url = self.config().auth_url.clone();
        debug!("requesting app access token from {}", auth_url);

        let body = self
            .http_client()
            .post_form(auth_url, form)
            .await
            .map_err(|e| Error::Auth(format!("client credentials exchange failed: {e}")))?;

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Auth(format!("Error parsing token response: {e}")))?;

        if parsed.access_token.is_empty() {
            return Err(Error::Auth("token endpoint returned an empty access_token".into()));
        }

        info!(
            "App access token provisioned (type='{}', expires in {} s)",
            parsed.token_type, parsed.expires_in
        );
        self.set_bearer_token(parsed.access_token);
        Ok(())
    }
}
