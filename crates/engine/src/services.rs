//! Capability bundle for the built-in hooks
//!
//! The built-in hooks depend on external collaborators (user directory,
//! counter store, translation catalog, trigger-condition evaluator) and on
//! the shared template engine. [`Services`] groups them so registry
//! construction takes one argument.

use crate::condition::TemplateTriggerCondition;
use curata_core::{CounterStore, Translator, TriggerCondition, UserDirectory};
use curata_template::TemplateEngine;
use std::sync::Arc;

/// The collaborators the built-in hooks are wired to
#[derive(Clone)]
pub struct Services {
    /// Account lookup by email
    pub users: Arc<dyn UserDirectory>,

    /// Global counter persistence
    pub counters: Arc<dyn CounterStore>,

    /// Translation-key lookup for counter prefixes
    pub translator: Arc<dyn Translator>,

    /// Gate for conditional hooks (strip/restore)
    pub conditions: Arc<dyn TriggerCondition>,

    /// Shared template engine for counter templates, field templates and
    /// template-based trigger conditions
    pub templates: Arc<TemplateEngine>,
}

impl Services {
    /// Bundle the given capabilities with a fresh template engine and the
    /// default template-based trigger condition
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        counters: Arc<dyn CounterStore>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let templates = Arc::new(TemplateEngine::new());
        let conditions = Arc::new(TemplateTriggerCondition::new(Arc::clone(&templates)));
        Self {
            users,
            counters,
            translator,
            conditions,
            templates,
        }
    }

    /// Replace the trigger-condition evaluator
    #[must_use]
    pub fn with_conditions(mut self, conditions: Arc<dyn TriggerCondition>) -> Self {
        self.conditions = conditions;
        self
    }
}
