//! Core module
//!
//! Configuration, lifecycle events, and error types

mod config;
mod error;
mod events;

pub use config::CompanionConfig;
pub use error::{ConfigError, SpawnError};
pub use events::{CompanionEvent, EventQueue};
