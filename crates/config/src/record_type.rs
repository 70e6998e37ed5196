//! Record type configuration
//!
//! A record type declares, per trigger mode, three ordered hook lists, one
//! per phase. Hook descriptors name a registered behavior by id and carry an
//! opaque options object that is handed to the hook verbatim.
//!
//! Wire field names keep the original camelCase (`onCreate`, `postSync`,
//! `function`) so existing configuration carries over unchanged.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Configuration for one record type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordType {
    /// Record type name, referenced from `metaMetadata.type`
    pub name: String,

    /// Hook lists per trigger mode
    pub hooks: TriggerHooks,
}

impl RecordType {
    /// Parse a record type from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Parse a record type from a JSON value
    pub fn from_json(raw: Value) -> Result<Self> {
        Ok(serde_json::from_value(raw)?)
    }

    /// The hook set configured for `mode`
    pub fn hooks_for(&self, mode: TriggerMode) -> &HookSet {
        match mode {
            TriggerMode::OnCreate => &self.hooks.on_create,
            TriggerMode::OnUpdate => &self.hooks.on_update,
        }
    }

    /// Iterate every descriptor in every mode and phase
    pub fn all_descriptors(&self) -> impl Iterator<Item = &HookDescriptor> {
        [&self.hooks.on_create, &self.hooks.on_update]
            .into_iter()
            .flat_map(|set| {
                set.pre
                    .iter()
                    .chain(set.post_sync.iter())
                    .chain(set.post.iter())
            })
    }
}

/// Hook lists keyed by trigger mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerHooks {
    /// Hooks run when a record is created
    #[serde(rename = "onCreate")]
    pub on_create: HookSet,

    /// Hooks run when a record is updated
    #[serde(rename = "onUpdate")]
    pub on_update: HookSet,
}

/// Ordered hook lists for the three phases of one trigger mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookSet {
    /// Run synchronously before the save; each hook's output record feeds the next
    pub pre: Vec<HookDescriptor>,

    /// Run synchronously after the save, threading an accumulating response
    #[serde(rename = "postSync")]
    pub post_sync: Vec<HookDescriptor>,

    /// Launched after the save without blocking the caller
    pub post: Vec<HookDescriptor>,
}

impl HookSet {
    /// The descriptor list for `phase`
    pub fn phase(&self, phase: Phase) -> &[HookDescriptor] {
        match phase {
            Phase::Pre => &self.pre,
            Phase::PostSync => &self.post_sync,
            Phase::Post => &self.post,
        }
    }

    /// True when no phase has any hooks
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post_sync.is_empty() && self.post.is_empty()
    }
}

/// One configured hook invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookDescriptor {
    /// Identifier of a registered hook behavior
    #[serde(rename = "function", alias = "functionId")]
    pub function_id: String,

    /// Options passed verbatim to the hook
    #[serde(default = "empty_options")]
    pub options: Value,
}

fn empty_options() -> Value {
    Value::Object(serde_json::Map::new())
}

impl HookDescriptor {
    /// Create a descriptor with empty options
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            options: empty_options(),
        }
    }

    /// Create a descriptor with the given options
    pub fn with_options(function_id: impl Into<String>, options: Value) -> Self {
        Self {
            function_id: function_id.into(),
            options,
        }
    }
}

/// Lifecycle event kind selecting a hook set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Record creation
    #[serde(rename = "onCreate")]
    OnCreate,
    /// Record update
    #[serde(rename = "onUpdate")]
    OnUpdate,
}

impl TriggerMode {
    /// The configuration key for this mode
    pub fn name(self) -> &'static str {
        match self {
            TriggerMode::OnCreate => "onCreate",
            TriggerMode::OnUpdate => "onUpdate",
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Execution phase within a trigger mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Sequential, record-threading, failures abort the save
    #[serde(rename = "pre")]
    Pre,
    /// Sequential, response-threading, failures abort the request
    #[serde(rename = "postSync")]
    PostSync,
    /// Fire-and-forget, failures are logged only
    #[serde(rename = "post")]
    Post,
}

impl Phase {
    /// The configuration key for this phase
    pub fn name(self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::PostSync => "postSync",
            Phase::Post => "post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
