//! Base error types for curata
//!
//! This module provides the foundation error types that all crates can use.

use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// A dotted path could not be applied to a value tree
    #[error("Invalid record path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Record (de)serialization error
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record store failure
    #[error("Record store error: {0}")]
    Store(String),

    /// User directory is unreachable
    #[error("User directory error: {0}")]
    Directory(String),

    /// Counter entity could not be read or written
    #[error("Counter store error: {0}")]
    Counter(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
