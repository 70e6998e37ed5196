//! Field templating hook
//!
//! `runTemplates` renders a list of configured templates and writes each
//! result to a record path. Templates run in declaration order against the
//! record's current state, so a later template sees the writes of an
//! earlier one.

use crate::error::{Error, Result};
use crate::registry::{Hook, HookContext};
use async_trait::async_trait;
use curata_core::Record;
use curata_template::{TemplateContext, TemplateEngine};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Options accepted by `runTemplates`
#[derive(Debug, Deserialize)]
struct TemplatesOptions {
    #[serde(default)]
    templates: Vec<FieldTemplate>,
}

/// One field/template pair
#[derive(Debug, Clone, Deserialize)]
struct FieldTemplate {
    /// Record path the rendered value is written to
    field: String,

    /// Template source
    template: String,
}

/// Render configured templates into record fields
pub struct RunTemplates {
    templates: Arc<TemplateEngine>,
}

impl RunTemplates {
    /// Create the hook rendering with `templates`
    #[must_use]
    pub fn new(templates: Arc<TemplateEngine>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl Hook for RunTemplates {
    fn name(&self) -> &'static str {
        "runTemplates"
    }

    async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut record: Record,
        options: &Value,
    ) -> Result<Record> {
        let opts: TemplatesOptions =
            serde_json::from_value(options.clone()).map_err(|e| Error::InvalidOptions {
                hook: "runTemplates",
                reason: e.to_string(),
            })?;

        for config in &opts.templates {
            // Rebuilt per template so each sees the previous writes.
            let mut template_ctx = TemplateContext::new()
                .with_oid(ctx.oid)
                .with_record(record.to_value()?)
                .with_options(options.clone());
            if let Some(user) = ctx.user {
                template_ctx = template_ctx
                    .with_user(serde_json::to_value(user).map_err(curata_core::Error::from)?);
            }

            let rendered = self
                .templates
                .render_named_str(&config.field, &config.template, &template_ctx)
                .map_err(|e| Error::TemplateRender {
                    field: config.field.clone(),
                    source: e,
                })?;
            tracing::debug!(oid = ctx.oid, field = %config.field, "rendered field template");
            record.set_path(&config.field, json!(rendered))?;
        }

        Ok(record)
    }
}
