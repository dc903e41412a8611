pub mod config;
pub mod console;
pub mod credentials;
pub mod daytime;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod lights;
pub mod location;
pub mod pairing;
pub mod schedule;
pub mod skill;
pub mod talk;
pub mod tasks;
