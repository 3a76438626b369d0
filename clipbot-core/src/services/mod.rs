pub mod clips;

pub use clips::command_service::ClipsCommandService;
