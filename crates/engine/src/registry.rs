//! Hook contract and registry
//!
//! Hook identifiers in record type configuration are plain strings; the
//! registry maps them to statically-typed behaviors. Resolution is pure
//! lookup and never executes the behavior; unknown identifiers can be
//! rejected at configuration-load time via [`HookRegistry::validate`].

use crate::error::{Error, Result};
use crate::hooks;
use crate::services::Services;
use async_trait::async_trait;
use curata_config::RecordType;
use curata_core::{Record, User};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Per-invocation context shared by every hook in a pipeline run
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Identifier of the record being saved
    pub oid: &'a str,

    /// The user who triggered the lifecycle event, if any
    pub user: Option<&'a User>,
}

/// A configured behavior invoked at a lifecycle phase
///
/// Hooks are polymorphic over two invocation shapes. The record shape
/// ([`run`](Hook::run)) consumes and returns the record; pre and post hooks
/// use it. The response shape ([`run_with_response`](Hook::run_with_response))
/// borrows the record and threads an accumulating response value; postSync
/// hooks use it. The default response-shape implementation runs the record
/// shape and passes the response through, so implementing `run` is enough
/// for a hook to be usable in every phase.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &'static str;

    /// Record shape: mutate and return the record
    async fn run(&self, ctx: &HookContext<'_>, record: Record, options: &Value) -> Result<Record>;

    /// Response shape: observe the record, thread the response
    async fn run_with_response(
        &self,
        ctx: &HookContext<'_>,
        record: &Record,
        options: &Value,
        response: Value,
    ) -> Result<Value> {
        self.run(ctx, record.clone(), options).await?;
        Ok(response)
    }
}

/// Registry mapping hook identifiers to behaviors
///
/// Insertion order is preserved so diagnostics list hooks the way they were
/// registered.
#[derive(Default)]
pub struct HookRegistry {
    hooks: IndexMap<String, Arc<dyn Hook>>,
}

impl HookRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: IndexMap::new(),
        }
    }

    /// Create a registry with the built-in hooks registered
    ///
    /// Registers `assignPermissions`, `processRecordCounters`,
    /// `stripUserBasedPermissions`, `restoreUserBasedPermissions` and
    /// `runTemplates`, wired to the given capability bundle.
    #[must_use]
    pub fn with_builtin_hooks(services: &Services) -> Self {
        let mut registry = Self::new();
        let gate = Arc::clone(&services.conditions);

        registry.register(
            "assignPermissions",
            Arc::new(hooks::permissions::AssignPermissions::new(Arc::clone(
                &services.users,
            ))),
        );
        registry.register(
            "processRecordCounters",
            Arc::new(hooks::counters::ProcessRecordCounters::new(
                Arc::clone(&services.counters),
                Arc::clone(&services.translator),
                Arc::clone(&services.templates),
            )),
        );
        registry.register(
            "stripUserBasedPermissions",
            Arc::new(hooks::permissions::StripUserBasedPermissions::new(
                gate.clone(),
            )),
        );
        registry.register(
            "restoreUserBasedPermissions",
            Arc::new(hooks::permissions::RestoreUserBasedPermissions::new(gate)),
        );
        registry.register(
            "runTemplates",
            Arc::new(hooks::templates::RunTemplates::new(Arc::clone(
                &services.templates,
            ))),
        );

        registry
    }

    /// Register a behavior under `id`, replacing any previous registration
    pub fn register(&mut self, id: impl Into<String>, hook: Arc<dyn Hook>) {
        let id = id.into();
        tracing::debug!(hook = %id, "registered hook");
        self.hooks.insert(id, hook);
    }

    /// Resolve `id` to its behavior without executing it
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn Hook>> {
        self.hooks
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownHook(id.to_string()))
    }

    /// True when `id` names a registered behavior
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.hooks.contains_key(id)
    }

    /// Check every descriptor of `record_type` against the registry
    ///
    /// Lets callers reject unregistered hook identifiers when configuration
    /// is loaded instead of when a record is saved.
    pub fn validate(&self, record_type: &RecordType) -> Result<()> {
        for descriptor in record_type.all_descriptors() {
            if !self.contains(&descriptor.function_id) {
                return Err(Error::UnknownHook(descriptor.function_id.clone()));
            }
        }
        Ok(())
    }
}
