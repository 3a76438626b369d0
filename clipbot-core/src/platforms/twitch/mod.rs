// File: src/platforms/twitch/mod.rs

pub mod client;
pub mod requests;

pub use client::{HelixConfig, TwitchHelixClient, DEFAULT_AUTH_URL, DEFAULT_HELIX_URL};
