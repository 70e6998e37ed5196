//! Error types for the trigger pipeline
//!
//! Propagation follows the phase contract: `pre` and `postSync` errors are
//! fatal to the enclosing save and reach the caller unchanged; `post` errors
//! are caught at the per-hook boundary, logged with hook identity and oid,
//! and discarded.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the trigger pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration references a hook id with no registered behavior
    #[error("Unknown hook '{0}' referenced in record type configuration")]
    UnknownHook(String),

    /// A configured template failed to evaluate
    #[error("Failed to render template for '{field}': {source}")]
    TemplateRender {
        field: String,
        #[source]
        source: curata_template::Error,
    },

    /// The user directory could not be consulted
    #[error("Contributor resolution failed for '{email}': {reason}")]
    ContributorResolution { email: String, reason: String },

    /// A counter entity could not be read or written
    #[error("Counter '{name}' (branding '{branding}') persistence failed: {reason}")]
    CounterPersistence {
        name: String,
        branding: String,
        reason: String,
    },

    /// A hook's options did not match the shape it expects
    #[error("Invalid options for hook '{hook}': {reason}")]
    InvalidOptions { hook: &'static str, reason: String },

    /// Core data-model failure (path writes, serialization)
    #[error(transparent)]
    Core(#[from] curata_core::Error),
}
