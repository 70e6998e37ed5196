//! Core types and utilities for curata
//!
//! This is the foundation crate (Layer 0) that all other curata crates depend on.
//! It provides:
//! - The record data model (Record, Authorization, MetaMetadata, User)
//! - Dotted-path access over JSON value trees
//! - Base error types
//! - Capability traits for the collaborators the trigger pipeline consumes
//!   (RecordStore, UserDirectory, CounterStore, Translator, TriggerCondition)
//!
//! This crate has no dependencies on other curata crates.

pub mod error;
pub mod record;
pub mod traits;
pub mod value;

pub use error::{Error, Result};
pub use record::{Authorization, MetaMetadata, Record, StoredAuthorization, User, Workflow};
pub use traits::{Counter, CounterStore, RecordStore, Translator, TriggerCondition, UserDirectory};
