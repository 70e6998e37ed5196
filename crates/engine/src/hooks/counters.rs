//! Record counter hook
//!
//! `processRecordCounters` increments one or more counters per save. A
//! `field` counter derives its next value from what the record already
//! holds; a `global` counter is backed by the counter store and scoped to
//! the record's branding. Either way the incremented number is formatted
//! (template, then prefix) and written back into the metadata tree.

use crate::error::{Error, Result};
use crate::registry::{Hook, HookContext};
use async_trait::async_trait;
use curata_core::{CounterStore, Record, Translator};
use curata_template::{TemplateContext, TemplateEngine};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

/// Options accepted by `processRecordCounters`
#[derive(Debug, Deserialize)]
struct CountersOptions {
    #[serde(default)]
    counters: Vec<CounterConfig>,
}

/// One configured counter
///
/// Option keys stay snake_case on the wire, unlike the camelCase record
/// envelope; existing counter configuration carries over unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CounterConfig {
    /// Metadata field the formatted value is written to; also the counter
    /// name for the global strategy
    field_name: String,

    /// Increment strategy
    #[serde(default)]
    strategy: Strategy,

    /// For the field strategy: read the current value from this metadata
    /// field instead of `field_name`
    #[serde(default)]
    source_field: String,

    /// Template formatting the incremented value; bound to this
    /// configuration's own fields plus `newVal`
    #[serde(default)]
    template: String,

    /// Translation key rendered in front of the formatted value
    #[serde(default)]
    prefix: String,

    /// Record-rooted path of an array the formatted value is also appended to
    #[serde(default)]
    add_value_to_array: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Strategy {
    #[default]
    Field,
    Global,
}

/// Increment configured counters and write the formatted values back
pub struct ProcessRecordCounters {
    store: Arc<dyn CounterStore>,
    translator: Arc<dyn Translator>,
    templates: Arc<TemplateEngine>,
}

impl ProcessRecordCounters {
    /// Create the hook against the given counter store and translator
    #[must_use]
    pub fn new(
        store: Arc<dyn CounterStore>,
        translator: Arc<dyn Translator>,
        templates: Arc<TemplateEngine>,
    ) -> Self {
        Self {
            store,
            translator,
            templates,
        }
    }

    /// Format `new_val` per the configuration and write it into the record
    fn apply(&self, record: &mut Record, config: &CounterConfig, new_val: i64) -> Result<()> {
        let rendered = if config.template.is_empty() {
            new_val.to_string()
        } else {
            let config_tree = serde_json::to_value(config).map_err(curata_core::Error::from)?;
            let mut ctx = TemplateContext::new().with_flattened(&config_tree);
            ctx.add_variable("newVal", json!(new_val));
            self.templates
                .render_str(&config.template, &ctx)
                .map_err(|e| Error::TemplateRender {
                    field: config.field_name.clone(),
                    source: e,
                })?
        };

        let prefix_text = if config.prefix.is_empty() {
            String::new()
        } else {
            self.translator.translate(&config.prefix)
        };
        let rec_val = format!("{prefix_text}{rendered}");

        record.set_path(&format!("metadata.{}", config.field_name), json!(rec_val))?;

        if !config.add_value_to_array.is_empty() {
            // Unlike the field write, the array path is rooted at the record.
            let mut items = record
                .get_path(&config.add_value_to_array)
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            items.push(json!(rec_val));
            record.set_path(&config.add_value_to_array, Value::Array(items))?;
        }

        Ok(())
    }
}

#[async_trait]
impl Hook for ProcessRecordCounters {
    fn name(&self) -> &'static str {
        "processRecordCounters"
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut record: Record,
        options: &Value,
    ) -> Result<Record> {
        let opts: CountersOptions =
            serde_json::from_value(options.clone()).map_err(|e| Error::InvalidOptions {
                hook: "processRecordCounters",
                reason: e.to_string(),
            })?;
        if opts.counters.is_empty() {
            return Ok(record);
        }

        let branding = record.meta_metadata.brand_id.clone();

        // Every global counter is read before any is written; the reads of
        // one save observe a consistent snapshot of the store.
        let global_configs: Vec<&CounterConfig> = opts
            .counters
            .iter()
            .filter(|c| c.strategy == Strategy::Global)
            .collect();
        let reads = join_all(global_configs.iter().map(|config| {
            let store = Arc::clone(&self.store);
            let branding = branding.clone();
            let name = config.field_name.clone();
            async move { store.find_or_create(&name, &branding).await }
        }))
        .await;

        let mut globals = Vec::with_capacity(global_configs.len());
        for (config, outcome) in global_configs.iter().zip(reads) {
            let counter = outcome.map_err(|e| Error::CounterPersistence {
                name: config.field_name.clone(),
                branding: branding.clone(),
                reason: e.to_string(),
            })?;
            globals.push(((*config).clone(), counter.value + 1));
        }

        for config in &opts.counters {
            if config.strategy != Strategy::Field {
                continue;
            }
            let source = if config.source_field.is_empty() {
                &config.field_name
            } else {
                &config.source_field
            };
            let new_val = next_field_value(record.get_path(&format!("metadata.{source}")));
            tracing::debug!(oid = ctx.oid, field = %config.field_name, new_val, "field counter");
            self.apply(&mut record, config, new_val)?;
        }

        let mut updates = Vec::with_capacity(globals.len());
        for (config, new_val) in globals {
            tracing::debug!(oid = ctx.oid, field = %config.field_name, new_val, "global counter");
            self.apply(&mut record, &config, new_val)?;
            updates.push((config.field_name, new_val));
        }

        let writes = join_all(updates.iter().map(|(name, new_val)| {
            let store = Arc::clone(&self.store);
            let branding = branding.clone();
            async move { store.update_value(name, &branding, *new_val).await }
        }))
        .await;
        for ((name, _), outcome) in updates.iter().zip(writes) {
            outcome.map_err(|e| Error::CounterPersistence {
                name: name.clone(),
                branding: branding.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(record)
    }
}

/// Next value for a field counter given the field's current content
///
/// Absent, null, empty or unparseable values start the sequence at 1.
/// Strings are parsed so a previously formatted value keeps counting.
fn next_field_value(current: Option<Value>) -> i64 {
    match current {
        Some(Value::Number(n)) => n.as_i64().map_or(1, |v| v + 1),
        Some(Value::String(s)) if !s.is_empty() => {
            s.trim().parse::<i64>().map_or(1, |v| v + 1)
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_next_field_value_starts_at_one() {
        assert_eq!(next_field_value(None), 1);
        assert_eq!(next_field_value(Some(Value::Null)), 1);
        assert_eq!(next_field_value(Some(json!(""))), 1);
        assert_eq!(next_field_value(Some(json!("not a number"))), 1);
    }

    #[test]
    fn test_next_field_value_increments() {
        assert_eq!(next_field_value(Some(json!(4))), 5);
        assert_eq!(next_field_value(Some(json!("41"))), 42);
    }
}
