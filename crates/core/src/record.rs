//! The record data model
//!
//! A [`Record`] is the unit of state the trigger pipeline mutates. Its
//! `metadata` is a free-form JSON tree (forms decide its shape, not this
//! library), while the surrounding envelope of `metaMetadata`,
//! `authorization` and `workflow` is typed. Field names on the wire keep the
//! original camelCase so records round-trip against existing stores.
//!
//! Ownership is transient: the pipeline borrows or owns a record for the
//! duration of one lifecycle event and hands it back to the storage layer.

use crate::error::Result;
use crate::value;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A research-data record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Form-defined metadata tree, arbitrary nesting
    pub metadata: Value,

    /// Envelope describing the record itself
    #[serde(rename = "metaMetadata")]
    pub meta_metadata: MetaMetadata,

    /// Access control lists
    pub authorization: Authorization,

    /// Workflow position
    pub workflow: Workflow,

    /// Top-level fields this library does not model; preserved verbatim so
    /// path writes outside the typed envelope survive round-trips
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Record {
    /// Create a record with the given metadata tree
    pub fn with_metadata(metadata: Value) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// View the whole record as a JSON value tree
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read the value at a dotted path over the whole record
    ///
    /// Paths are rooted at the record, so metadata fields are addressed as
    /// `metadata.title`. Returns `None` when any step is missing.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        // Fast path: most reads target the metadata tree directly.
        if let Some(rest) = path.strip_prefix("metadata.") {
            return value::get_path(&self.metadata, rest).cloned();
        }
        let tree = self.to_value().ok()?;
        value::get_path(&tree, path).cloned()
    }

    /// Write `val` at a dotted path, creating intermediate containers
    ///
    /// Writes into `metadata.*` mutate the metadata tree in place; writes
    /// elsewhere round-trip the record through its JSON representation so the
    /// typed envelope stays consistent.
    pub fn set_path(&mut self, path: &str, val: Value) -> Result<()> {
        if let Some(rest) = path.strip_prefix("metadata.") {
            if self.metadata.is_null() {
                self.metadata = Value::Object(serde_json::Map::new());
            }
            return value::set_path(&mut self.metadata, rest, val);
        }
        let mut tree = self.to_value()?;
        value::set_path(&mut tree, path, val)?;
        *self = serde_json::from_value(tree)?;
        Ok(())
    }
}

/// Envelope describing a record: who created it, under which brand, from
/// which form, and what record type it belongs to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaMetadata {
    /// Branding (tenant) identifier; global counters are scoped by it
    #[serde(rename = "brandId")]
    pub brand_id: String,

    /// Username of the record creator
    #[serde(rename = "createdBy")]
    pub created_by: String,

    /// Name of the form that produced the metadata tree
    pub form: String,

    /// Record type name, resolves to hook configuration
    #[serde(rename = "type")]
    pub record_type: String,
}

/// Access control lists for a record
///
/// `edit`/`view` hold usernames, the pending lists hold contributor emails
/// that did not resolve to an account. A pending list that is absent is
/// distinct from one that is empty: hooks only touch pending lists that
/// exist on the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorization {
    /// Usernames with edit access
    pub edit: Vec<String>,

    /// Usernames with view access
    pub view: Vec<String>,

    /// Roles with edit access
    #[serde(rename = "editRoles")]
    pub edit_roles: Vec<String>,

    /// Roles with view access
    #[serde(rename = "viewRoles")]
    pub view_roles: Vec<String>,

    /// Emails awaiting an account with edit access
    #[serde(rename = "editPending", skip_serializing_if = "Option::is_none")]
    pub edit_pending: Option<Vec<String>>,

    /// Emails awaiting an account with view access
    #[serde(rename = "viewPending", skip_serializing_if = "Option::is_none")]
    pub view_pending: Option<Vec<String>>,

    /// Snapshot taken by the strip hook; present exactly when a strip has
    /// happened without a matching restore
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<StoredAuthorization>,
}

/// Snapshot of user-based permissions taken by the strip hook
///
/// Each category is only present when the strip covered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredAuthorization {
    /// Stripped edit usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<Vec<String>>,

    /// Stripped pending edit emails
    #[serde(rename = "editPending", skip_serializing_if = "Option::is_none")]
    pub edit_pending: Option<Vec<String>>,

    /// Stripped view usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<Vec<String>>,

    /// Stripped pending view emails
    #[serde(rename = "viewPending", skip_serializing_if = "Option::is_none")]
    pub view_pending: Option<Vec<String>>,
}

/// Workflow position of a record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    /// Current stage name
    pub stage: String,

    /// Configuration of the current stage
    #[serde(rename = "stageConfig")]
    pub stage_config: Value,
}

/// A user account as seen by the pipeline; read-only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Account username, written into authorization edit/view lists
    pub username: String,

    /// Primary email, matched case-insensitively against contributors
    pub email: String,

    /// Role names
    pub roles: Vec<String>,
}
