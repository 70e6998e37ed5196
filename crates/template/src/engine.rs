//! Template engine implementation
//!
//! The engine wraps minijinja and exposes only the documented helper
//! functions. Hooks share one engine instance behind an `Arc`.

use crate::functions;
use crate::{Error, Result};
use minijinja::Environment;
use serde::Serialize;

/// Template engine for rendering hook templates
pub struct TemplateEngine {
    /// The minijinja environment
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the helper functions registered
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        // The constrained helper surface: date and number formatting only.
        env.add_function("now", functions::now);
        env.add_function("formatDate", functions::format_date);
        env.add_function("formatNumber", functions::format_number);

        Self { env }
    }

    /// Render a template string with the given context
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails
    pub fn render_str<S: Serialize>(&self, template: &str, context: &S) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::from)
    }

    /// Render a template string with a specific name for better error messages
    ///
    /// Preferred over `render_str` when a meaningful name (a configured field
    /// path, say) can be associated with the template.
    pub fn render_named_str<S: Serialize>(
        &self,
        name: &str,
        template: &str,
        context: &S,
    ) -> Result<String> {
        self.env
            .render_named_str(name, template, context)
            .map_err(Error::from)
    }

    /// Check if a string contains template syntax
    ///
    /// Simple heuristic looking for Jinja-style markers.
    #[must_use]
    pub fn is_template(content: &str) -> bool {
        content.contains("{{") || content.contains("{%") || content.contains("{#")
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
