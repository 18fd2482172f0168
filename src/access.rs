//! Access-control rule lookup.
//!
//! The rules themselves live in the host application. The generator only needs
//! their documentation text, keyed by the handler that serves a route.

use crate::call::HandlerRef;
use log::debug;
use std::collections::BTreeMap;

/// Documentation of an access rule attached to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Who may call the endpoint, as free text
    pub doc: String,
}

impl AccessRule {
    pub fn new(doc: impl Into<String>) -> Self {
        Self { doc: doc.into() }
    }
}

/// Looks up the access rule guarding a handler.
pub trait AccessRuleLookup {
    /// Returns the rule for `handler`, or `None` if it has no rule.
    fn lookup(&self, handler: &HandlerRef) -> Option<AccessRule>;
}

impl<F> AccessRuleLookup for F
where
    F: Fn(&HandlerRef) -> Option<AccessRule>,
{
    fn lookup(&self, handler: &HandlerRef) -> Option<AccessRule> {
        self(handler)
    }
}

/// Lookup that never finds a rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccessRules;

impl AccessRuleLookup for NoAccessRules {
    fn lookup(&self, _handler: &HandlerRef) -> Option<AccessRule> {
        None
    }
}

/// Table of rule documentation keyed by handler path.
///
/// Keys may be either the full handler path (`indivo::views::record`) or just
/// its short name (`record`). The full path is tried first.
#[derive(Debug, Clone, Default)]
pub struct AccessRules {
    rules: BTreeMap<String, String>,
}

impl AccessRules {
    pub fn new(rules: BTreeMap<String, String>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl AccessRuleLookup for AccessRules {
    fn lookup(&self, handler: &HandlerRef) -> Option<AccessRule> {
        let doc = self
            .rules
            .get(handler.as_str())
            .or_else(|| self.rules.get(handler.short_name()));

        if doc.is_none() {
            debug!("No access rule for handler {}", handler);
        }

        doc.map(AccessRule::new)
    }
}
