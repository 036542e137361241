pub mod config;
pub mod groups;
pub mod play;
mod script;
mod source;
