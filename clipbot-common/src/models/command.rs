use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A subcommand that replaces the normal clip lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubCommand {
    /// `!clips help`
    Help,
    /// `!clips top[N]`, carrying N.
    Top(u32),
}

/// The parsed intent of one `!clips` chat message.
///
/// Built once by the parser and never mutated afterwards. Empty strings and
/// `None` bounds mean "not given"; a command with an empty `broadcaster` and
/// no subcommand must be rejected before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipsCommand {
    pub broadcaster: String,
    pub creator: String,
    pub title: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub sub_command: Option<SubCommand>,
}

impl ClipsCommand {
    pub fn is_help(&self) -> bool {
        matches!(self.sub_command, Some(SubCommand::Help))
    }

    /// N for a `top` command, `None` for anything else.
    pub fn top(&self) -> Option<u32> {
        match self.sub_command {
            Some(SubCommand::Top(n)) => Some(n),
            _ => None,
        }
    }

    /// Whether the command may go on to broadcaster lookup and resolution.
    pub fn is_resolvable(&self) -> bool {
        !self.is_help() && !self.broadcaster.is_empty()
    }
}
