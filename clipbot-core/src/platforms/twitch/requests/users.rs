// ========================================================
// File: clipbot-core/src/platforms/twitch/requests/users.rs
// ========================================================
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use clipbot_common::models::Broadcaster;
use clipbot_common::traits::BroadcasterLookup;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Users" endpoint.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<Broadcaster>,
}

impl TwitchHelixClient {
    /// `GET /users?login=...` for each name, lowercased and without a leading `@`.
    pub async fn fetch_broadcasters(&self, names: &[String]) -> Result<Vec<Broadcaster>, Error> {
        if names.is_empty() {
            return Err(Error::NotFound("no broadcaster names given".into()));
        }

        let params: Vec<(&str, String)> = names
            .iter()
            .map(|name| ("login", name.trim_start_matches('@').to_lowercase()))
            .collect();
        let resp: UsersResponse = self.get_json("users", &params).await?;

        if resp.data.is_empty() {
            return Err(Error::NotFound(format!(
                "no broadcasters found for {}",
                names.join(", ")
            )));
        }

        debug!(
            "resolved broadcasters: {:?}",
            resp.data.iter().map(|b| (&b.login, &b.id)).collect::<Vec<_>>()
        );
        Ok(resp.data)
    }
}

#[async_trait]
impl BroadcasterLookup for TwitchHelixClient {
    async fn get_broadcasters_by_name(&self, names: &[String]) -> Result<Vec<Broadcaster>, Error> {
        self.fetch_broadcasters(names).await
    }
}
