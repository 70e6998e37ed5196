//! Pipeline executor
//!
//! One lifecycle event drives one pass through the three phases. The
//! executor resolves descriptors against the registry and applies the
//! phase-specific invocation semantics; the hooks themselves never see the
//! record type configuration, only their own options.

use crate::error::Result;
use crate::registry::{HookContext, HookRegistry};
use curata_config::{Phase, RecordType, TriggerMode};
use curata_core::{Record, User};
use serde_json::Value;
use std::sync::Arc;

/// Executor for the configured trigger hooks of a record type
///
/// Cheap to clone; one instance can serve every lifecycle event.
#[derive(Clone)]
pub struct TriggerPipeline {
    registry: Arc<HookRegistry>,
}

impl TriggerPipeline {
    /// Create a pipeline resolving hooks against `registry`
    #[must_use]
    pub fn new(registry: Arc<HookRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this pipeline resolves against
    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Run the `pre` phase: sequential, record-threading, fatal on failure
    ///
    /// Each hook receives the record returned by its predecessor. The first
    /// failure aborts the phase and surfaces to the caller; an unresolvable
    /// descriptor counts as a failure. Mutations applied by earlier hooks
    /// are not rolled back, the caller must discard the unsaved record.
    pub async fn run_pre_save_hooks(
        &self,
        oid: &str,
        mut record: Record,
        record_type: &RecordType,
        mode: TriggerMode,
        user: Option<&User>,
    ) -> Result<Record> {
        let descriptors = record_type.hooks_for(mode).phase(Phase::Pre);
        tracing::debug!(oid, %mode, count = descriptors.len(), "running pre-save hooks");

        let ctx = HookContext { oid, user };
        for descriptor in descriptors {
            let hook = self.registry.resolve(&descriptor.function_id)?;
            tracing::debug!(oid, hook = %descriptor.function_id, "pre-save hook");
            record = hook.run(&ctx, record, &descriptor.options).await?;
        }
        Ok(record)
    }

    /// Run the `postSync` phase: sequential, response-threading, fatal on failure
    ///
    /// The caller supplies the initial response value (usually an empty
    /// object); each hook's returned response feeds the next.
    pub async fn run_post_save_sync_hooks(
        &self,
        oid: &str,
        record: &Record,
        record_type: &RecordType,
        mode: TriggerMode,
        user: Option<&User>,
        mut response: Value,
    ) -> Result<Value> {
        let descriptors = record_type.hooks_for(mode).phase(Phase::PostSync);
        tracing::debug!(oid, %mode, count = descriptors.len(), "running post-save sync hooks");

        let ctx = HookContext { oid, user };
        for descriptor in descriptors {
            let hook = self.registry.resolve(&descriptor.function_id)?;
            tracing::debug!(oid, hook = %descriptor.function_id, "post-save sync hook");
            response = hook
                .run_with_response(&ctx, record, &descriptor.options, response)
                .await?;
            tracing::debug!(oid, hook = %descriptor.function_id, "post-save sync hook completed");
        }
        Ok(response)
    }

    /// Launch the `post` phase: fire-and-forget, never fails the caller
    ///
    /// Hooks are spawned in declaration order but run independently; a hook
    /// that fails, or a descriptor that does not resolve, is logged with
    /// its identity and the oid, and otherwise ignored. Requires a running
    /// tokio runtime.
    pub fn run_post_save_hooks(
        &self,
        oid: &str,
        record: &Record,
        record_type: &RecordType,
        mode: TriggerMode,
        user: Option<&User>,
    ) {
        let descriptors = record_type.hooks_for(mode).phase(Phase::Post);
        tracing::debug!(oid, %mode, count = descriptors.len(), "dispatching post-save hooks");

        for descriptor in descriptors {
            // A bad identifier in the post phase is a configuration error,
            // reported but not fatal to the save.
            let hook = match self.registry.resolve(&descriptor.function_id) {
                Ok(hook) => hook,
                Err(e) => {
                    tracing::error!(oid, hook = %descriptor.function_id, error = %e,
                        "post-save hook did not resolve, skipping");
                    continue;
                }
            };

            let oid = oid.to_string();
            let hook_id = descriptor.function_id.clone();
            let options = descriptor.options.clone();
            let record = record.clone();
            let user = user.cloned();
            tokio::spawn(async move {
                let ctx = HookContext {
                    oid: &oid,
                    user: user.as_ref(),
                };
                match hook.run(&ctx, record, &options).await {
                    Ok(_) => {
                        tracing::debug!(oid, hook = %hook_id, "post-save hook completed");
                    }
                    Err(e) => {
                        tracing::error!(oid, hook = %hook_id, error = %e, "post-save hook failed");
                    }
                }
            });
        }
    }
}
