use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalog entry from Helix `GET /clips`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub embed_url: String,
    pub broadcaster_id: String,
    pub broadcaster_name: String,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub language: String,
    pub title: String,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: String,
}

/// The placeholder a resolution scans for: the broadcaster to page through,
/// the text filters, and the time bounds.
///
/// Resolvers hand this value back unmodified when nothing matched, so callers
/// can tell "not found" apart from a real result by equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipQuery {
    pub broadcaster_id: String,
    pub title: String,
    pub creator_name: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl ClipQuery {
    pub fn new(broadcaster_id: impl Into<String>) -> Self {
        Self {
            broadcaster_id: broadcaster_id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_creator(mut self, creator_name: impl Into<String>) -> Self {
        self.creator_name = creator_name.into();
        self
    }

    pub fn with_bounds(
        mut self,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.started_at = started_at;
        self.ended_at = ended_at;
        self
    }
}

/// Parameters for a single catalog page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPageRequest {
    pub broadcaster_id: String,
    /// Continuation cursor from the previous page.
    pub after: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Page size hint.
    pub first: u32,
}

/// One page of clips plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipPage {
    pub clips: Vec<Clip>,
    pub cursor: Option<String>,
}

impl ClipPage {
    /// A page is terminal when it is empty or carries no continuation cursor.
    pub fn is_last(&self) -> bool {
        self.clips.is_empty() || self.cursor.as_deref().map_or(true, str::is_empty)
    }
}
