pub mod clips;
pub mod token;
pub mod users;
