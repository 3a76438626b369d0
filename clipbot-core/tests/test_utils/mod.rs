// File: clipbot-core/tests/test_utils/mod.rs

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use clipbot_common::models::{Broadcaster, Clip, ClipPage, ClipPageRequest};
use clipbot_common::traits::{BroadcasterLookup, ClipCatalog};
use clipbot_core::Error;

/// A clip with only the fields the resolver looks at filled in.
pub fn clip(id: &str, title: &str, creator: &str, views: u64) -> Clip {
    Clip {
        id: id.to_string(),
        url: format!("https://clips.twitch.tv/{}", id),
        embed_url: String::new(),
        broadcaster_id: "1234".to_string(),
        broadcaster_name: "Streamer".to_string(),
        creator_id: format!("c-{}", creator),
        creator_name: creator.to_string(),
        video_id: String::new(),
        game_id: String::new(),
        language: "en".to_string(),
        title: title.to_string(),
        view_count: views,
        created_at: Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap(),
        thumbnail_url: String::new(),
    }
}

pub fn page(clips: Vec<Clip>, cursor: Option<&str>) -> ClipPage {
    ClipPage {
        clips,
        cursor: cursor.map(str::to_string),
    }
}

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Serves queued pages in order and records every request it receives.
/// Returns an empty terminal page once the queue runs out.
#[derive(Clone, Default)]
pub struct StubCatalog {
    pages: Arc<Mutex<VecDeque<Result<ClipPage, Error>>>>,
    pub requests: Arc<Mutex<Vec<ClipPageRequest>>>,
}

impl StubCatalog {
    pub fn with_pages(pages: Vec<ClipPage>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages.into_iter().map(Ok).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_error(&self, error: Error) {
        self.pages.lock().await.push_back(Err(error));
    }

    pub async fn recorded(&self) -> Vec<ClipPageRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ClipCatalog for StubCatalog {
    async fn get_clips(&self, request: &ClipPageRequest) -> Result<ClipPage, Error> {
        self.requests.lock().await.push(request.clone());
        self.pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ClipPage::default()))
    }
}

/// Knows a fixed set of broadcasters by login.
#[derive(Clone, Default)]
pub struct StubLookup {
    known: Vec<Broadcaster>,
    fail_with_transport: bool,
}

impl StubLookup {
    pub fn with(login: &str, id: &str) -> Self {
        Self {
            known: vec![Broadcaster {
                id: id.to_string(),
                login: login.to_string(),
                display_name: login.to_string(),
                ..Default::default()
            }],
            fail_with_transport: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            known: Vec::new(),
            fail_with_transport: true,
        }
    }
}

#[async_trait]
impl BroadcasterLookup for StubLookup {
    async fn get_broadcasters_by_name(&self, names: &[String]) -> Result<Vec<Broadcaster>, Error> {
        if self.fail_with_transport {
            return Err(Error::Platform("HTTP 503 Service Unavailable => down".into()));
        }
        let found: Vec<Broadcaster> = self
            .known
            .iter()
            .filter(|b| names.iter().any(|n| n.eq_ignore_ascii_case(&b.login)))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(Error::NotFound(names.join(", ")));
        }
        Ok(found)
    }
}
