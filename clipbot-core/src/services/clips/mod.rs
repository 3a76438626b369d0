//! The `!clips` command: parsing chat text into a [`ClipsCommand`] and
//! resolving it against the Helix clip catalog.
//!
//! [`ClipsCommand`]: clipbot_common::models::ClipsCommand

pub mod command_service;
pub mod dates;
pub mod matching;
pub mod parser;
pub mod resolver;

pub use matching::{MatchPredicate, Matcher};
pub use parser::{parse_command, parse_command_at, COMMAND_PREFIX, DEFAULT_TOP};
pub use resolver::{ClipMatch, ClipResolver, Resolution, ResolverConfig, Strategy};
