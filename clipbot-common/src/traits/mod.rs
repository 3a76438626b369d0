pub mod api;

pub use api::{BroadcasterLookup, ClipCatalog};
