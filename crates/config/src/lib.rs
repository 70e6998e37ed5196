//! Configuration management for curata
//!
//! This crate handles:
//! - Record type configuration: which hooks run at which lifecycle points
//! - Trigger mode (`onCreate`/`onUpdate`) and phase (`pre`/`postSync`/`post`) vocabulary
//! - Logging initialization
//!
//! Record types are configuration entities, not runtime state: they are
//! loaded once (from TOML or JSON) and consulted by the pipeline executor on
//! every lifecycle event.

pub mod logging;
pub mod record_type;

pub use record_type::{HookDescriptor, HookSet, Phase, RecordType, TriggerHooks, TriggerMode};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum Error {
    /// TOML parse failure
    #[error("Failed to parse record type config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure
    #[error("Failed to parse record type config: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialized
    #[error("Logging setup error: {0}")]
    Logging(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
