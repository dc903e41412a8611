pub mod config;
pub mod dialog;
pub mod host;
pub mod recording;
