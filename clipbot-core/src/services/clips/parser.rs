// File: clipbot-core/src/services/clips/parser.rs

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use clipbot_common::models::{ClipsCommand, SubCommand};

use crate::Error;
use crate::services::clips::dates::resolve_dates;

/// Messages must start with this marker to be treated as a `!clips` command.
/// A marker that only appears later in the message does not count.
pub const COMMAND_PREFIX: &str = "!clips";

/// N for a bare `top`, or a `top` whose suffix is not a number.
pub const DEFAULT_TOP: u32 = 10;

const HELP_TOKEN: &str = "help";
const TOP_TOKEN: &str = "top";

/// Parse a chat message into a [`ClipsCommand`], resolving relative dates
/// against the current time.
pub fn parse_command(text: &str) -> Result<ClipsCommand, Error> {
    parse_command_at(text, Utc::now())
}

/// Parse a chat message into a [`ClipsCommand`].
///
/// The text is reduced left to right: prefix, dates, quoted title, an
/// optional `help`/`topN` subcommand, then broadcaster and creator by
/// position. Missing pieces are left empty; only a missing prefix or an
/// invalid date fail the parse.
pub fn parse_command_at(text: &str, now: DateTime<Utc>) -> Result<ClipsCommand, Error> {
    let Some(rest) = text.strip_prefix(COMMAND_PREFIX) else {
        return Err(Error::NotACommand(format!(
            "message must start with \"{}\"",
            COMMAND_PREFIX
        )));
    };

    let mut command = ClipsCommand::default();

    let dates = resolve_dates(rest, now)?;
    command.started_at = dates.started_at;
    command.ended_at = dates.ended_at;

    let (title, residual) = take_quoted(&dates.residual);
    if let Some(title) = title {
        command.title = title;
    }

    let mut words: Vec<&str> = residual.split_whitespace().collect();
    debug!("Parsing args: {:?}", words);

    if let Some(&first) = words.first() {
        if first == HELP_TOKEN {
            command.sub_command = Some(SubCommand::Help);
            words.remove(0);
        } else if let Some(suffix) = first.strip_prefix(TOP_TOKEN) {
            command.sub_command = Some(SubCommand::Top(parse_top(suffix)));
            words.remove(0);
        }
    }

    let mut positional = words.into_iter();
    if let Some(broadcaster) = positional.next() {
        // chat users often mention the channel as `@name`
        command.broadcaster = broadcaster.trim_start_matches('@').to_string();
    }
    if let Some(creator) = positional.next() {
        command.creator = creator.to_string();
    }

    Ok(command)
}

fn parse_top(suffix: &str) -> u32 {
    if suffix.is_empty() {
        debug!("no count after \"top\", using {}", DEFAULT_TOP);
        return DEFAULT_TOP;
    }
    match suffix.parse::<u32>() {
        Ok(n) => n,
        Err(e) => {
            warn!(
                "ignoring non-numeric top count '{}' ({}), falling back to {}",
                suffix, e, DEFAULT_TOP
            );
            DEFAULT_TOP
        }
    }
}

/// Pull the first quoted segment out of `text`.
///
/// A double-quoted segment is preferred; a single-quoted one is used only when
/// there is no complete double-quoted segment. The closing quote must be the
/// same character as the opening one, and exactly that span is removed. An
/// empty `""` is removed without producing a title; an unterminated quote is
/// left alone.
fn take_quoted(text: &str) -> (Option<String>, String) {
    for delim in ['"', '\''] {
        let Some(open) = text.find(delim) else {
            continue;
        };
        let inner_start = open + delim.len_utf8();
        let Some(len) = text[inner_start..].find(delim) else {
            continue;
        };
        let close = inner_start + len;
        let title = &text[inner_start..close];
        let residual = format!("{}{}", &text[..open], &text[close + delim.len_utf8()..]);
        let title = (!title.is_empty()).then(|| title.to_string());
        return (title, residual);
    }
    (None, text.to_string())
}
