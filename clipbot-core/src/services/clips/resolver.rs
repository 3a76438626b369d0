// File: clipbot-core/src/services/clips/resolver.rs

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use clipbot_common::models::{Clip, ClipPageRequest, ClipQuery, ClipsCommand};
use clipbot_common::traits::ClipCatalog;

use crate::Error;
use crate::services::clips::matching::Matcher;

/// Helix caps `first` at 100.
pub const PAGE_SIZE: u32 = 100;

/// Lookback applied when a query has no start bound.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub default_lookback: Duration,
    pub page_size: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
            page_size: PAGE_SIZE,
        }
    }
}

/// How a scan turns matching clips into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// First match in catalog order.
    FirstMatch,
    /// Highest view count among all matches; ties keep the earliest seen.
    MostPopular,
    /// Up to N matches by descending view count.
    Top(usize),
}

impl Strategy {
    /// `top` => Top(N). Title and creator both given => FirstMatch, since the
    /// query is specific enough that any hit is the clip. Otherwise many clips
    /// can match a partial filter, so => MostPopular.
    pub fn for_command(command: &ClipsCommand) -> Self {
        if let Some(n) = command.top() {
            return Strategy::Top(n as usize);
        }
        if !command.title.is_empty() && !command.creator.is_empty() {
            Strategy::FirstMatch
        } else {
            Strategy::MostPopular
        }
    }
}

/// Outcome of a single-clip strategy. `NotFound` hands back the query exactly
/// as it was passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipMatch {
    Found(Clip),
    NotFound(ClipQuery),
}

impl ClipMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, ClipMatch::Found(_))
    }

    pub fn clip(&self) -> Option<&Clip> {
        match self {
            ClipMatch::Found(clip) => Some(clip),
            ClipMatch::NotFound(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Single(ClipMatch),
    Top(Vec<Clip>),
}

/// Walks the clip catalog one page at a time and applies a [`Strategy`].
#[derive(Clone)]
pub struct ClipResolver {
    catalog: Arc<dyn ClipCatalog>,
    config: ResolverConfig,
}

impl ClipResolver {
    pub fn new(catalog: Arc<dyn ClipCatalog>, config: ResolverConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The bounds actually sent to the catalog. A missing start becomes the
    /// default lookback before `now`, and a missing end becomes `now`; Helix
    /// would otherwise cut an open range off one week after the start.
    pub fn scope(&self, query: &ClipQuery, now: DateTime<Utc>) -> ClipQuery {
        let mut scoped = query.clone();
        if scoped.started_at.is_none() {
            scoped.started_at = Some(now - self.config.default_lookback);
        }
        if scoped.ended_at.is_none() {
            scoped.ended_at = Some(now);
        }
        scoped
    }

    pub async fn resolve(
        &self,
        strategy: Strategy,
        query: &ClipQuery,
        matcher: &Matcher,
    ) -> Result<Resolution, Error> {
        match strategy {
            Strategy::FirstMatch => Ok(Resolution::Single(self.find_clip(query, matcher).await?)),
            Strategy::MostPopular => Ok(Resolution::Single(
                self.find_most_popular_clip(query, matcher).await?,
            )),
            Strategy::Top(n) => Ok(Resolution::Top(
                self.find_most_popular_clips(query, matcher, n).await?,
            )),
        }
    }

    /// First clip, in catalog order, for which `matcher` holds.
    pub async fn find_clip(&self, query: &ClipQuery, matcher: &Matcher) -> Result<ClipMatch, Error> {
        let mut found = None;
        self.scan(query, |clip| {
            if matcher.matches(&clip, query) {
                found = Some(clip);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await?;

        Ok(match found {
            Some(clip) => ClipMatch::Found(clip),
            None => ClipMatch::NotFound(query.clone()),
        })
    }

    /// Matching clip with the highest view count. The floor starts at zero
    /// and only a strictly greater count replaces the current best, so equal
    /// counts keep the earliest clip and zero-view clips never win.
    pub async fn find_most_popular_clip(
        &self,
        query: &ClipQuery,
        matcher: &Matcher,
    ) -> Result<ClipMatch, Error> {
        let mut best: Option<Clip> = None;
        let mut best_views = 0u64;
        self.scan(query, |clip| {
            if clip.view_count > best_views && matcher.matches(&clip, query) {
                best_views = clip.view_count;
                best = Some(clip);
            }
            ControlFlow::Continue(())
        })
        .await?;

        Ok(match best {
            Some(clip) => ClipMatch::Found(clip),
            None => ClipMatch::NotFound(query.clone()),
        })
    }

    /// At most `n` matching clips by descending view count. Equal counts stay
    /// in discovery order. Only the current top `n` are held in memory.
    pub async fn find_most_popular_clips(
        &self,
        query: &ClipQuery,
        matcher: &Matcher,
        n: usize,
    ) -> Result<Vec<Clip>, Error> {
        let mut top: Vec<Clip> = Vec::with_capacity(n.min(self.config.page_size as usize));
        if n == 0 {
            return Ok(top);
        }
        self.scan(query, |clip| {
            if matcher.matches(&clip, query) {
                insert_ranked(&mut top, clip, n);
            }
            ControlFlow::Continue(())
        })
        .await?;
        Ok(top)
    }

    /// Request pages until one comes back empty or without a cursor, or until
    /// `visit` breaks. Any fetch error aborts the scan.
    async fn scan<F>(&self, query: &ClipQuery, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(Clip) -> ControlFlow<()>,
    {
        let scoped = self.scope(query, Utc::now());
        let mut after: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let request = ClipPageRequest {
                broadcaster_id: scoped.broadcaster_id.clone(),
                after: after.take(),
                started_at: scoped.started_at,
                ended_at: scoped.ended_at,
                first: self.config.page_size,
            };
            debug!(
                "requesting clips page {} for broadcaster_id={} after={:?}",
                pages + 1,
                request.broadcaster_id,
                request.after
            );

            let page = self.catalog.get_clips(&request).await?;
            pages += 1;
            let last = page.is_last();

            for clip in page.clips {
                if visit(clip).is_break() {
                    debug!("scan stopped early after {} page(s)", pages);
                    return Ok(());
                }
            }
            if last {
                break;
            }
            after = page.cursor;
        }

        info!(
            "scanned {} clip page(s) for broadcaster_id={}",
            pages, scoped.broadcaster_id
        );
        Ok(())
    }
}

/// Insert `clip` into `top`, which is sorted by descending view count, keeping
/// at most `n` entries. The clip goes after any existing entry with an equal
/// count.
fn insert_ranked(top: &mut Vec<Clip>, clip: Clip, n: usize) {
    let pos = top.partition_point(|existing| existing.view_count >= clip.view_count);
    if pos >= n {
        return;
    }
    top.insert(pos, clip);
    top.truncate(n);
}
