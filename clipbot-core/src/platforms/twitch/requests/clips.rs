// File: clipbot-core/src/platforms/twitch/requests/clips.rs

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;

use clipbot_common::models::{Clip, ClipPage, ClipPageRequest};
use clipbot_common::traits::ClipCatalog;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from `GET /helix/clips`.
#[derive(Debug, Deserialize)]
pub struct ClipsResponse {
    pub data: Vec<Clip>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination object; `cursor` is absent on the last page.
#[derive(Debug, Deserialize, Default)]
pub struct Pagination {
    pub cursor: Option<String>,
}

impl TwitchHelixClient {
    /// One page of clips for a broadcaster, optionally bounded in time.
    pub async fn get_clips_page(&self, request: &ClipPageRequest) -> Result<ClipPage, Error> {
        let mut params = vec![
            ("broadcaster_id", request.broadcaster_id.clone()),
            ("first", request.first.to_string()),
        ];
        if let Some(after) = request.after.as_ref().filter(|c| !c.is_empty()) {
            params.push(("after", after.clone()));
        }
        if let Some(started_at) = request.started_at {
            params.push(("started_at", started_at.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(ended_at) = request.ended_at {
            params.push(("ended_at", ended_at.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let resp: ClipsResponse = self.get_json("clips", &params).await?;
        let cursor = resp.pagination.cursor.filter(|c| !c.is_empty());

        Ok(ClipPage {
            clips: resp.data,
            cursor,
        })
    }
}

#[async_trait]
impl ClipCatalog for TwitchHelixClient {
    async fn get_clips(&self, request: &ClipPageRequest) -> Result<ClipPage, Error> {
        self.get_clips_page(request).await
    }
}
