pub mod client;

pub use client::{ChatMessage, IrcLine, TwitchIrcClient};
