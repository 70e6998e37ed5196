//! Trigger condition evaluators
//!
//! Conditional hooks (strip/restore) are gated by a boolean condition
//! evaluated against `(oid, record, options)`. [`TemplateTriggerCondition`]
//! recovers the original behavior: the condition is a template in
//! `options.triggerCondition` whose trimmed output must be the string
//! `"true"`. A missing condition means the hook always runs.

use curata_core::{Record, TriggerCondition};
use curata_template::{TemplateContext, TemplateEngine};
use serde_json::Value;
use std::sync::Arc;

/// Condition that always allows the hook to run
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTrue;

impl TriggerCondition for AlwaysTrue {
    fn evaluate(&self, _oid: &str, _record: &Record, _options: &Value) -> bool {
        true
    }
}

/// Condition driven by an `options.triggerCondition` template
pub struct TemplateTriggerCondition {
    templates: Arc<TemplateEngine>,
}

impl TemplateTriggerCondition {
    /// Create an evaluator rendering conditions with `templates`
    #[must_use]
    pub fn new(templates: Arc<TemplateEngine>) -> Self {
        Self { templates }
    }
}

impl TriggerCondition for TemplateTriggerCondition {
    fn evaluate(&self, oid: &str, record: &Record, options: &Value) -> bool {
        let Some(template) = options.get("triggerCondition").and_then(Value::as_str) else {
            // No condition configured: the hook runs unconditionally.
            return true;
        };

        let Ok(record_tree) = record.to_value() else {
            return false;
        };
        let ctx = TemplateContext::new()
            .with_oid(oid)
            .with_record(record_tree)
            .with_options(options.clone());

        match self.templates.render_str(template, &ctx) {
            Ok(rendered) => rendered.trim() == "true",
            Err(e) => {
                tracing::error!(oid, error = %e, "trigger condition failed to evaluate");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;

    fn evaluator() -> TemplateTriggerCondition {
        TemplateTriggerCondition::new(Arc::new(TemplateEngine::new()))
    }

    #[test]
    fn test_missing_condition_is_true() {
        let gate = evaluator();
        assert!(gate.evaluate("oid", &Record::default(), &json!({})));
    }

    #[test]
    fn test_condition_matches_record_state() {
        let gate = evaluator();
        let record = Record::with_metadata(json!({"visibility": "private"}));
        let options = json!({
            "triggerCondition":
                "{% if record.metadata.visibility == 'private' %}true{% else %}false{% endif %}"
        });
        assert!(gate.evaluate("oid", &record, &options));

        let public = Record::with_metadata(json!({"visibility": "public"}));
        assert!(!gate.evaluate("oid", &public, &options));
    }

    #[test]
    fn test_render_failure_is_false() {
        let gate = evaluator();
        let options = json!({"triggerCondition": "{{ 1 | bogusfilter }}"});
        assert!(!gate.evaluate("oid", &Record::default(), &options));
    }

    #[test]
    fn test_always_true() {
        assert!(AlwaysTrue.evaluate("oid", &Record::default(), &json!({})));
    }
}
