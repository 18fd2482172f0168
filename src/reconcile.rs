//! Merging hand-edited calls with freshly discovered ones.
//!
//! Route discovery knows the structural facts of a call (path, method,
//! handler, parameter names) but nothing about what it does. The registry file
//! holds the descriptions people wrote. [`CallReconciler`] combines the two,
//! field by field.

use crate::call::{CallRecord, DefaultMaps, Field, FieldKind, FieldValue, ParamMap};
use crate::registry::CallRegistry;
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Resolves the fields of a discovered call against its saved counterpart.
#[derive(Debug, Clone, Copy)]
pub struct CallReconciler<'a> {
    discovered: &'a CallRecord,
    saved: &'a CallRecord,
    prefer_saved: bool,
}

impl<'a> CallReconciler<'a> {
    /// Pairs two calls, preferring the saved side.
    pub fn new(discovered: &'a CallRecord, saved: &'a CallRecord) -> Self {
        Self {
            discovered,
            saved,
            prefer_saved: true,
        }
    }

    pub fn prefer_saved(&mut self) -> &mut Self {
        self.prefer_saved = true;
        self
    }

    pub fn prefer_discovered(&mut self) -> &mut Self {
        self.prefer_saved = false;
        self
    }

    pub fn prefers_saved(&self) -> bool {
        self.prefer_saved
    }

    /// Value a merged call should use for `field`.
    ///
    /// Mapping fields are resolved per key over the keys of both sides. Scalar
    /// fields are resolved directly, using the field name as the key into
    /// `defaults`.
    pub fn resolve(&self, field: Field, defaults: Option<&DefaultMaps>) -> FieldValue {
        let field_defaults = defaults.and_then(|maps| maps.get(field.name()));

        match field.kind() {
            FieldKind::Mapping => {
                let empty = ParamMap::new();
                let discovered = self.discovered.mapping(field).unwrap_or(&empty);
                let saved = self.saved.mapping(field).unwrap_or(&empty);

                let keys: BTreeSet<&String> = discovered.keys().chain(saved.keys()).collect();
                let resolved = keys
                    .into_iter()
                    .map(|key| {
                        let value = self.pick(
                            discovered.get(key).map(String::as_str),
                            saved.get(key).map(String::as_str),
                            field_defaults.and_then(|d| d.get(key)).map(String::as_str),
                        );
                        (key.clone(), value)
                    })
                    .collect();
                FieldValue::Map(resolved)
            }
            FieldKind::Scalar => {
                let value = self.pick(
                    self.discovered.scalar(field).map(String::as_str),
                    self.saved.scalar(field).map(String::as_str),
                    field_defaults
                        .and_then(|d| d.get(field.name()))
                        .map(String::as_str),
                );
                FieldValue::Text(value)
            }
        }
    }

    /// Builds the merged call: structure from the discovered side, the
    /// documentation fields from [`resolve`](Self::resolve).
    ///
    /// The access doc also follows the discovered side, since it is derived
    /// from the current handler.
    pub fn merge(&self, defaults: Option<&DefaultMaps>) -> CallRecord {
        let mut merged = self.discovered.clone();
        for &field in crate::call::FIELDS {
            if field == Field::AccessDoc {
                continue;
            }
            merged.set_field(field, self.resolve(field, defaults));
        }
        merged
    }

    fn pick(&self, discovered: Option<&str>, saved: Option<&str>, default: Option<&str>) -> String {
        let is_empty = |value: Option<&str>| value.map_or(true, str::is_empty);

        let chosen = if (self.prefer_saved && !is_empty(saved)) || is_empty(discovered) {
            saved
        } else {
            discovered
        };

        match chosen {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.unwrap_or_default().to_string(),
        }
    }
}

/// How [`merge_registries`] treats the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Hand-edited text wins over discovered text
    pub prefer_saved: bool,
    /// Delete saved calls that no longer match a route
    pub prune: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            prefer_saved: true,
            prune: false,
        }
    }
}

/// What [`merge_registries`] did to the saved registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Saved titles with no discovered route, in title order
    pub stale: Vec<String>,
    /// Whether the stale titles were deleted
    pub pruned: bool,
}

/// Folds the discovered calls into `saved`.
///
/// Calls known to both sides are reconciled; new calls get `defaults` applied.
/// Saved calls without a route are reported, and deleted when
/// `options.prune` is set.
pub fn merge_registries(
    saved: &mut CallRegistry,
    discovered: &CallRegistry,
    defaults: &DefaultMaps,
    options: MergeOptions,
) -> MergeSummary {
    let mut summary = MergeSummary::default();

    for call in discovered.values() {
        let merged = match saved.get(&call.title()) {
            Some(saved_call) => {
                let mut reconciler = CallReconciler::new(call, saved_call);
                if !options.prefer_saved {
                    reconciler.prefer_discovered();
                }
                reconciler.merge(Some(defaults))
            }
            None => {
                let mut fresh = call.clone();
                fresh.apply_defaults(defaults);
                fresh
            }
        };

        let title = merged.title();
        match saved.set(merged) {
            None => {
                debug!("Added {}", title);
                summary.added += 1;
            }
            Some(previous) if saved.get(&title) != Some(&previous) => {
                debug!("Updated {}", title);
                summary.updated += 1;
            }
            Some(_) => summary.unchanged += 1,
        }
    }

    summary.stale = saved
        .keys()
        .filter(|title| !discovered.contains(title))
        .map(str::to_string)
        .collect();

    if options.prune {
        for title in &summary.stale {
            info!("Removing {}: no matching route", title);
            saved.delete(title);
        }
        summary.pruned = !summary.stale.is_empty();
    } else {
        for title in &summary.stale {
            warn!("{} is in the registry but no route serves it", title);
        }
    }

    summary
}
