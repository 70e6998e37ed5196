//! # Curata Engine
//!
//! The record-mutation trigger pipeline.
//!
//! A lifecycle event (create or update) hands `(oid, record, recordType,
//! mode, user)` to the [`TriggerPipeline`]. The pipeline reads the record
//! type's configured hook lists, resolves each descriptor against the
//! [`HookRegistry`], and invokes the hooks with phase-specific semantics:
//!
//! - **pre**: sequential, each hook's output record feeds the next; any
//!   failure aborts the save.
//! - **postSync**: sequential, threading an accumulating response value;
//!   failures abort the request.
//! - **post**: fire-and-forget; failures are logged and never reach the
//!   caller.
//!
//! The built-in hooks (permission resolution, counter increments and field
//! templating) live in [`hooks`] and are registered by
//! [`HookRegistry::with_builtin_hooks`].

pub mod condition;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod registry;
pub mod services;

pub use condition::{AlwaysTrue, TemplateTriggerCondition};
pub use error::{Error, Result};
pub use pipeline::TriggerPipeline;
pub use registry::{Hook, HookContext, HookRegistry};
pub use services::Services;

// Re-export the vocabulary callers need alongside the pipeline
pub use curata_config::{HookDescriptor, Phase, RecordType, TriggerMode};
pub use curata_core::{Record, User};
