use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use clipbot_common::models::{Clip, ClipQuery, ClipsCommand};
use clipbot_common::traits::BroadcasterLookup;

use crate::Error;
use crate::services::clips::matching::Matcher;
use crate::services::clips::parser::{parse_command, COMMAND_PREFIX};
use crate::services::clips::resolver::{ClipMatch, ClipResolver, Resolution, Strategy};
use crate::utils::time::format_day;

pub const HELP_TEXT: &str = "Search for Twitch clips. \
Usage: !clips [topN|help] streamer \"title\" creator [start_date [end_date] | Nd|Nm|Ny]. \
streamer is required. \
topN lists the N most viewed clips (default 10). \
\"title\" matches part of the clip title and must be quoted. \
creator filters by clip creator and must come after streamer. \
Dates are YYYY-MM-DD, or 7d/1m/2y for the days/months/years before today \
(up to midnight UTC, so today's clips are not included). \
Without a start date the last 7 days up to now are searched.";

pub const MISSING_BROADCASTER_REPLY: &str =
    "I need at least the name of a streamer to look for clips! Use \"!clips help\" for more info.";
pub const NO_MATCH_REPLY: &str = "I couldn't find a clip that matches your search.";
pub const BAD_DATE_REPLY: &str =
    "I couldn't understand those dates. Use YYYY-MM-DD (start first), or something like 7d, 1m or 2y.";
pub const TRANSPORT_FAILURE_REPLY: &str =
    "Something went wrong talking to Twitch. Please try again in a bit.";

/// Turns `!clips` chat messages into reply text.
///
/// Each call is independent; the service only holds shared read-only
/// handles, so messages can be handled concurrently.
#[derive(Clone)]
pub struct ClipsCommandService {
    lookup: Arc<dyn BroadcasterLookup>,
    resolver: ClipResolver,
}

impl ClipsCommandService {
    pub fn new(lookup: Arc<dyn BroadcasterLookup>, resolver: ClipResolver) -> Self {
        debug!("Initializing ClipsCommandService");
        Self { lookup, resolver }
    }

    /// Whether `text` is addressed to this service at all.
    pub fn is_command(text: &str) -> bool {
        text.starts_with(COMMAND_PREFIX)
    }

    /// Returns the reply for a chat message, or `None` when the message is not
    /// a `!clips` command.
    pub async fn handle_message(&self, text: &str) -> Option<String> {
        let command = match parse_command(text) {
            Ok(command) => command,
            Err(Error::NotACommand(_)) => return None,
            Err(Error::DateParse(e)) => {
                info!("rejecting '{}': {}", text, e);
                return Some(BAD_DATE_REPLY.to_string());
            }
            Err(e) => {
                error!("unexpected parse failure for '{}': {}", text, e);
                return Some(TRANSPORT_FAILURE_REPLY.to_string());
            }
        };
        debug!("Command: {:?}", command);

        Some(self.handle_command(&command).await)
    }

    /// Reply for an already parsed command.
    pub async fn handle_command(&self, command: &ClipsCommand) -> String {
        if command.is_help() {
            return HELP_TEXT.to_string();
        }
        if !command.is_resolvable() {
            return MISSING_BROADCASTER_REPLY.to_string();
        }

        match self.resolve(command).await {
            Ok(reply) => reply,
            Err(Error::NotFound(e)) => {
                info!("broadcaster lookup for '{}' failed: {}", command.broadcaster, e);
                streamer_not_found_reply(&command.broadcaster)
            }
            Err(e) => {
                error!("resolution for {:?} aborted: {}", command, e);
                TRANSPORT_FAILURE_REPLY.to_string()
            }
        }
    }

    async fn resolve(&self, command: &ClipsCommand) -> Result<String, Error> {
        let broadcasters = self
            .lookup
            .get_broadcasters_by_name(&[command.broadcaster.clone()])
            .await?;
        let Some(broadcaster) = broadcasters.into_iter().next() else {
            return Err(Error::NotFound(command.broadcaster.clone()));
        };

        let query = ClipQuery::new(broadcaster.id)
            .with_title(command.title.clone())
            .with_creator(command.creator.clone())
            .with_bounds(command.started_at, command.ended_at);
        let strategy = Strategy::for_command(command);
        info!(
            "resolving clips for '{}' (id={}) with {:?}",
            command.broadcaster, query.broadcaster_id, strategy
        );

        let resolution = self
            .resolver
            .resolve(strategy, &query, &Matcher::title_and_creator())
            .await?;

        Ok(match resolution {
            Resolution::Single(ClipMatch::Found(clip)) => format!("Found your clip: {}", clip.url),
            Resolution::Single(ClipMatch::NotFound(_)) => NO_MATCH_REPLY.to_string(),
            Resolution::Top(clips) if clips.is_empty() => {
                warn!("no clips for '{}' in range", command.broadcaster);
                no_clips_reply(&command.broadcaster)
            }
            Resolution::Top(clips) => {
                let scoped = self.resolver.scope(&query, Utc::now());
                let from = scoped.started_at.map(format_day).unwrap_or_default();
                let to = scoped.ended_at.map(format_day).unwrap_or_default();
                format_top_list(&command.broadcaster, &from, &to, &clips)
            }
        })
    }
}

pub fn streamer_not_found_reply(broadcaster: &str) -> String {
    format!(
        "Couldn't find a streamer named \"{}\". Could you check the name and try again?",
        broadcaster
    )
}

pub fn no_clips_reply(broadcaster: &str) -> String {
    format!(
        "Couldn't find any \"{}\" clips. Check the streamer name and the date bounds.",
        broadcaster
    )
}

/// Header line followed by one `<rank>. "<title>" by <creator>. Views: <count>`
/// line per clip.
pub fn format_top_list(broadcaster: &str, from: &str, to: &str, clips: &[Clip]) -> String {
    let mut msg = format!(
        "Top {} {} clips from {} to {}",
        clips.len(),
        broadcaster,
        from,
        to
    );
    for (i, clip) in clips.iter().enumerate() {
        msg.push_str(&format!(
            "\n{}. \"{}\" by {}. Views: {}",
            i + 1,
            clip.title,
            clip.creator_name,
            clip.view_count
        ));
    }
    msg
}
