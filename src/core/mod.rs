pub mod config;
pub mod language;
pub mod player;
pub mod preferences;
