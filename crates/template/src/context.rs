//! Template context management
//!
//! The context carries the documented bindings for a hook's template: the
//! event's `oid`, the `record` tree, the acting `user` and the hook
//! `options`, plus flattened extra variables (counter configurations bind
//! their own fields and `newVal` this way).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Data available to templates during rendering
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateContext {
    /// Record identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,

    /// The record as a JSON tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Value>,

    /// The acting user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    /// The hook's options, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    /// Extra variables, flattened for direct access
    /// e.g. {{ `newVal` }} instead of {{ `variables.newVal` }}
    #[serde(flatten)]
    pub variables: IndexMap<String, Value>,
}

impl TemplateContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record identifier
    #[must_use]
    pub fn with_oid(mut self, oid: impl Into<String>) -> Self {
        self.oid = Some(oid.into());
        self
    }

    /// Set the record tree
    #[must_use]
    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }

    /// Set the acting user
    #[must_use]
    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the hook options
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Flatten the members of a JSON object into the context variables
    ///
    /// Non-object values are ignored. Used to expose a counter configuration
    /// to its own template.
    #[must_use]
    pub fn with_flattened(mut self, object: &Value) -> Self {
        if let Some(map) = object.as_object() {
            for (key, val) in map {
                self.variables.insert(key.clone(), val.clone());
            }
        }
        self
    }

    /// Add a single variable
    pub fn add_variable(&mut self, key: impl Into<String>, value: Value) {
        self.variables.insert(key.into(), value);
    }
}
