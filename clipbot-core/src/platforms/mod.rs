// File: src/platforms/mod.rs

pub mod twitch;
pub mod twitch_irc;
