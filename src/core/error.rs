//! Error types shared across the crate

use thiserror::Error;

use crate::assets::Appearance;

/// Errors that can occur while spawning a companion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// No visual model is registered for the requested appearance
    #[error("no model available for appearance {appearance:?}")]
    AppearanceUnavailable {
        /// Appearance that was requested
        appearance: Appearance,
    },
    /// The model was found but its entities could not be created
    #[error("failed to instantiate companion model {model}")]
    Instantiation {
        /// Model that was being instantiated
        model: String,
    },
}

/// Errors that can occur while loading, saving, or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Deserialization error
    #[error("parse error: {0}")]
    Parse(String),
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialize(String),
    /// A value is out of its allowed range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },
}
