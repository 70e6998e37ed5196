//! # Curata Template
//!
//! Constrained template evaluation for curata using minijinja.
//!
//! Hooks render configured field values and counter templates through this
//! crate. The evaluator deliberately exposes only the documented bindings
//! (the event's `oid`, `record`, `user` and `options` plus date and number
//! formatting helpers) and never a general-purpose code evaluator.

pub mod context;
pub mod engine;
pub mod functions;

pub use context::TemplateContext;
pub use engine::TemplateEngine;

use thiserror::Error;

/// Result type for template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Template engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Template rendering error
    #[error("Template error at {location}: {message}")]
    Render { location: String, message: String },

    /// Template syntax error
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        let location = match (err.name(), err.line()) {
            (Some(name), Some(line)) => format!("{name} line {line}"),
            (None, Some(line)) => format!("line {line}"),
            (Some(name), None) => name.to_string(),
            (None, None) => "unknown location".to_string(),
        };

        Error::Render {
            location,
            message: err.to_string(),
        }
    }
}
