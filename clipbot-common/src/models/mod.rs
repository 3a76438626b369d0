pub mod broadcaster;
pub mod clip;
pub mod command;

pub use broadcaster::Broadcaster;
pub use clip::{Clip, ClipPage, ClipPageRequest, ClipQuery};
pub use command::{ClipsCommand, SubCommand};
