//! Built-in hook implementations
//!
//! The three hook families that ship with the pipeline: permission
//! resolution and snapshotting, counter increment strategies, and field
//! templating. Each is an ordinary [`Hook`](crate::Hook) registered under a
//! stable identifier by
//! [`HookRegistry::with_builtin_hooks`](crate::HookRegistry::with_builtin_hooks).

pub mod counters;
pub mod permissions;
pub mod templates;
