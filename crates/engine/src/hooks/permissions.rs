//! Permission resolution and snapshotting hooks
//!
//! `assignPermissions` turns configured contributor fields into edit/view
//! lists: emails that resolve against the user directory become usernames,
//! the rest stay on the pending lists. `stripUserBasedPermissions` and
//! `restoreUserBasedPermissions` snapshot the user-based lists into
//! `authorization.stored` and put them back, gated by a trigger condition.

use crate::error::{Error, Result};
use crate::registry::{Hook, HookContext};
use async_trait::async_trait;
use curata_core::{Record, StoredAuthorization, TriggerCondition, UserDirectory, value};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Options accepted by `assignPermissions`
#[derive(Debug, Deserialize)]
struct AssignOptions {
    /// Path to the email inside each contributor value
    #[serde(rename = "emailProperty", default = "default_email_property")]
    email_property: String,

    /// Record paths holding edit contributors
    #[serde(rename = "editContributorProperties", default)]
    edit_contributor_properties: Vec<String>,

    /// Record paths holding view contributors
    #[serde(rename = "viewContributorProperties", default)]
    view_contributor_properties: Vec<String>,

    /// Permission granted to the record creator: "edit", "view" or "view&edit"
    #[serde(rename = "recordCreatorPermissions", default)]
    record_creator_permissions: Option<String>,
}

fn default_email_property() -> String {
    "email".to_string()
}

/// Resolve contributor emails into edit/view permission lists
pub struct AssignPermissions {
    users: Arc<dyn UserDirectory>,
}

impl AssignPermissions {
    /// Create the hook against the given user directory
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Look up every email of one category, partitioning into resolved
    /// usernames and pending emails
    ///
    /// Lookups run concurrently; results keep the input order. A directory
    /// failure is fatal; "no such account" is `Ok(None)`, not an error.
    async fn resolve_category(&self, emails: &[String]) -> Result<(Vec<String>, Vec<String>)> {
        let lookups = join_all(emails.iter().map(|email| {
            let users = Arc::clone(&self.users);
            let needle = email.to_lowercase();
            async move { users.find_by_email(&needle).await }
        }))
        .await;

        let mut resolved = Vec::new();
        let mut pending = Vec::new();
        for (email, outcome) in emails.iter().zip(lookups) {
            match outcome {
                Ok(Some(user)) => resolved.push(user.username),
                Ok(None) => pending.push(email.clone()),
                Err(e) => {
                    return Err(Error::ContributorResolution {
                        email: email.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok((resolved, pending))
    }
}

#[async_trait]
impl Hook for AssignPermissions {
    fn name(&self) -> &'static str {
        "assignPermissions"
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut record: Record,
        options: &Value,
    ) -> Result<Record> {
        let opts: AssignOptions =
            serde_json::from_value(options.clone()).map_err(|e| Error::InvalidOptions {
                hook: "assignPermissions",
                reason: e.to_string(),
            })?;

        let record_tree = record.to_value()?;
        let edit_emails = collect_contributor_emails(
            &record_tree,
            &opts.edit_contributor_properties,
            &opts.email_property,
        );
        let view_emails = collect_contributor_emails(
            &record_tree,
            &opts.view_contributor_properties,
            &opts.email_property,
        );

        if edit_emails.is_empty() {
            tracing::warn!(oid = ctx.oid, "no edit contributors on record");
        }
        if view_emails.is_empty() {
            tracing::warn!(oid = ctx.oid, "no view contributors on record");
        }
        // Both categories empty is a legitimate no-op, not an error.
        if edit_emails.is_empty() && view_emails.is_empty() {
            return Ok(record);
        }

        let creator = &record.meta_metadata.created_by;
        let grants = opts.record_creator_permissions.as_deref().unwrap_or("");

        // Edit resolution, including its directory lookups, settles before
        // view resolution starts; later hooks depend on that ordering.
        if !edit_emails.is_empty() {
            let (mut edit_list, edit_pending) = self.resolve_category(&edit_emails).await?;
            if (grants == "edit" || grants == "view&edit") && !creator.is_empty() {
                edit_list.push(creator.clone());
            }
            record.authorization.edit = edit_list;
            record.authorization.edit_pending = Some(edit_pending);
        }

        if !view_emails.is_empty() {
            let (mut view_list, view_pending) = self.resolve_category(&view_emails).await?;
            if (grants == "view" || grants == "view&edit") && !creator.is_empty() {
                view_list.push(creator.clone());
            }
            record.authorization.view = view_list;
            record.authorization.view_pending = Some(view_pending);
        }

        Ok(record)
    }
}

/// Gather contributor emails from the configured record paths
///
/// A path may hold a single contributor or a sequence. A contributor is
/// either an object carrying the email under `email_property`, or a plain
/// string used as the email itself. Unusable values are skipped silently.
/// The result is deduplicated, keeping first occurrences.
fn collect_contributor_emails(
    record_tree: &Value,
    properties: &[String],
    email_property: &str,
) -> Vec<String> {
    let mut emails = Vec::new();
    for property in properties {
        let Some(contributor) = value::get_path(record_tree, property) else {
            continue;
        };
        match contributor {
            Value::Array(items) => {
                for item in items {
                    push_contributor_email(item, email_property, &mut emails);
                }
            }
            single => push_contributor_email(single, email_property, &mut emails),
        }
    }

    let mut unique = Vec::with_capacity(emails.len());
    for email in emails {
        if !unique.contains(&email) {
            unique.push(email);
        }
    }
    unique
}

fn push_contributor_email(contributor: &Value, email_property: &str, emails: &mut Vec<String>) {
    let email = value::get_path(contributor, email_property)
        .and_then(Value::as_str)
        .or_else(|| contributor.as_str());
    if let Some(email) = email
        && !email.is_empty()
    {
        tracing::trace!(email, "collected contributor email");
        emails.push(email.to_string());
    }
}

/// Options shared by the strip and restore hooks
#[derive(Debug, Deserialize)]
struct SnapshotOptions {
    /// Categories to strip: "edit" (default), "view" or "view&edit"
    #[serde(rename = "permissionTypes", default)]
    permission_types: Option<String>,
}

fn snapshot_mode(options: &Value) -> String {
    serde_json::from_value::<SnapshotOptions>(options.clone())
        .ok()
        .and_then(|o| o.permission_types)
        .unwrap_or_else(|| "edit".to_string())
}

/// Snapshot user-based permissions into `authorization.stored` and clear them
pub struct StripUserBasedPermissions {
    gate: Arc<dyn TriggerCondition>,
}

impl StripUserBasedPermissions {
    /// Create the hook gated by `gate`
    #[must_use]
    pub fn new(gate: Arc<dyn TriggerCondition>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Hook for StripUserBasedPermissions {
    fn name(&self) -> &'static str {
        "stripUserBasedPermissions"
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut record: Record,
        options: &Value,
    ) -> Result<Record> {
        if !self.gate.evaluate(ctx.oid, &record, options) {
            return Ok(record);
        }
        let mode = snapshot_mode(options);
        tracing::debug!(oid = ctx.oid, mode, "stripping user-based permissions");

        let auth = &mut record.authorization;
        let stored = auth.stored.get_or_insert_with(StoredAuthorization::default);

        if mode == "edit" || mode == "view&edit" {
            stored.edit = Some(auth.edit.clone());
            stored.edit_pending = auth.edit_pending.clone();
            auth.edit.clear();
            // Pending lists are only cleared when they exist on the record.
            if let Some(pending) = auth.edit_pending.as_mut() {
                pending.clear();
            }
        }

        if mode == "view" || mode == "view&edit" {
            stored.view = Some(auth.view.clone());
            stored.view_pending = auth.view_pending.clone();
            auth.view.clear();
            if let Some(pending) = auth.view_pending.as_mut() {
                pending.clear();
            }
        }

        Ok(record)
    }
}

/// Put a stored permission snapshot back and delete it
pub struct RestoreUserBasedPermissions {
    gate: Arc<dyn TriggerCondition>,
}

impl RestoreUserBasedPermissions {
    /// Create the hook gated by `gate`
    #[must_use]
    pub fn new(gate: Arc<dyn TriggerCondition>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Hook for RestoreUserBasedPermissions {
    fn name(&self) -> &'static str {
        "restoreUserBasedPermissions"
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut record: Record,
        options: &Value,
    ) -> Result<Record> {
        if !self.gate.evaluate(ctx.oid, &record, options) {
            return Ok(record);
        }
        // No snapshot, no-op.
        let Some(stored) = record.authorization.stored.take() else {
            return Ok(record);
        };
        tracing::debug!(oid = ctx.oid, "restoring user-based permissions");

        let auth = &mut record.authorization;
        if let Some(edit) = stored.edit {
            auth.edit = edit;
        }
        if let Some(pending) = stored.edit_pending {
            auth.edit_pending = Some(pending);
        }
        if let Some(view) = stored.view {
            auth.view = view;
        }
        if let Some(pending) = stored.view_pending {
            auth.view_pending = Some(pending);
        }

        Ok(record)
    }
}
