// src/lib.rs

pub mod http;
pub mod platforms;
pub mod services;
pub mod utils;

pub use clipbot_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
