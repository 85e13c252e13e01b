pub mod blog;
pub mod content;
pub mod music;
pub mod user;
