// ========================================================
// File: clipbot-common/src/traits/api.rs
// ========================================================

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{Broadcaster, ClipPage, ClipPageRequest};

/// Resolves human-entered channel names into broadcaster records.
#[async_trait]
pub trait BroadcasterLookup: Send + Sync {
    /// Returns every broadcaster matching `names`.
    /// Fails with `Error::NotFound` when nothing matched.
    async fn get_broadcasters_by_name(&self, names: &[String]) -> Result<Vec<Broadcaster>, Error>;
}

/// A cursor-paginated clip catalog.
#[async_trait]
pub trait ClipCatalog: Send + Sync {
    /// Fetches a single page. An empty or missing cursor on the returned page
    /// means there are no further pages.
    async fn get_clips(&self, request: &ClipPageRequest) -> Result<ClipPage, Error>;
}
