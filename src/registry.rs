//! Registry of API calls keyed by title, persisted as a YAML registry file.
//!
//! The registry file is regenerated by [`CallRegistry::persist`] and meant to
//! be hand-edited in between runs:
//!
//! ```yaml
//! imports:
//!   - "indivo::views"
//! calls:
//!   - method: "GET"
//!     path: "/records/{RECORD_ID}"
//!     handler: indivo::views::record
//!     access_doc: "The record owner"
//!     url_params:
//!       "RECORD_ID": "the record identifier"
//!     query_opts: {}
//!     data_fields: {}
//!     description: "Get basic record information."
//! ```

use crate::access::AccessRuleLookup;
use crate::call::{CallDescriptor, CallRecord};
use crate::error::{Error, Result};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Top-level key holding the call descriptors.
pub const CALLS_KEY: &str = "calls";
/// Top-level key listing the modules handlers may come from.
pub const IMPORTS_KEY: &str = "imports";

const HEADER: &str =
    "# API call registry. Regenerated by apidoc-from-routes; descriptions may be edited by hand.\n";

/// Ordered mapping from call title to [`CallRecord`].
#[derive(Debug, Clone, Default)]
pub struct CallRegistry {
    calls: BTreeMap<String, CallRecord>,
    dirty: bool,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a registry file.
    ///
    /// Access docs are looked up again through `rules`. The loaded registry is
    /// not dirty.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] if `path` does not exist
    /// - [`Error::MalformedRegistry`] if the file has no `calls` list, is not
    ///   valid YAML, or a handler's module is missing from `imports`
    pub fn load(path: &Path, rules: &dyn AccessRuleLookup) -> Result<Self> {
        debug!("Loading call registry from {}", path.display());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let document: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| Error::malformed(path, e))?;

        let Some(calls) = document.get(CALLS_KEY) else {
            return Err(Error::malformed(
                path,
                format!("missing top-level `{}` list", CALLS_KEY),
            ));
        };

        let imports: BTreeSet<String> = match document.get(IMPORTS_KEY) {
            Some(imports) => serde_yaml::from_value(imports.clone())
                .map_err(|e| Error::malformed(path, format!("bad `{}`: {}", IMPORTS_KEY, e)))?,
            None => BTreeSet::new(),
        };

        let descriptors: Vec<CallDescriptor> = serde_yaml::from_value(calls.clone())
            .map_err(|e| Error::malformed(path, format!("bad `{}`: {}", CALLS_KEY, e)))?;

        let mut registry = Self::new();
        for descriptor in descriptors {
            if let Some(module) = descriptor.handler.module() {
                if !imports.contains(module) {
                    return Err(Error::malformed(
                        path,
                        format!(
                            "handler `{}` comes from module `{}` which is not in `{}`",
                            descriptor.handler, module, IMPORTS_KEY
                        ),
                    ));
                }
            }

            let call = CallRecord::from_descriptor(descriptor, rules);
            // Loading mirrors the file; it must not dirty the registry.
            registry.calls.insert(call.title(), call);
        }

        info!("Loaded {} calls from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Like [`load`](Self::load), but a missing file yields an empty registry.
    pub fn load_or_empty(path: &Path, rules: &dyn AccessRuleLookup) -> Result<Self> {
        match Self::load(path, rules) {
            Err(Error::ConfigNotFound(missing)) => {
                info!(
                    "No registry at {}, starting from an empty one",
                    missing.display()
                );
                Ok(Self::new())
            }
            other => other,
        }
    }

    pub fn get(&self, title: &str) -> Option<&CallRecord> {
        self.calls.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.calls.contains_key(title)
    }

    /// Stores `call` under its title and returns the previous record.
    ///
    /// Marks the registry dirty if the stored value changed.
    pub fn set(&mut self, call: CallRecord) -> Option<CallRecord> {
        let title = call.title();
        let changed = self.calls.get(&title) != Some(&call);
        let previous = self.calls.insert(title, call);
        if changed {
            self.dirty = true;
        }
        previous
    }

    /// Removes the call with `title`. Always marks the registry dirty.
    pub fn delete(&mut self, title: &str) -> Option<CallRecord> {
        self.dirty = true;
        self.calls.remove(title)
    }

    /// Titles in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.calls.keys().map(String::as_str)
    }

    /// Calls in title order.
    pub fn values(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.values()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Calls sorted by `(path, method)`, the order used for all output.
    pub fn sorted(&self) -> Vec<&CallRecord> {
        let mut calls: Vec<&CallRecord> = self.calls.values().collect();
        calls.sort_by(|a, b| {
            (a.path(), a.method().as_str()).cmp(&(b.path(), b.method().as_str()))
        });
        calls
    }

    /// Renders the full registry file.
    pub fn to_source(&self) -> String {
        let imports: BTreeSet<&str> = self
            .calls
            .values()
            .filter_map(|call| call.handler().module())
            .collect();

        let mut out = String::from(HEADER);
        if imports.is_empty() {
            out.push_str(&format!("{}: []\n", IMPORTS_KEY));
        } else {
            out.push_str(&format!("{}:\n", IMPORTS_KEY));
            for module in imports {
                out.push_str(&format!("  - \"{}\"\n", module));
            }
        }

        let calls = self.sorted();
        if calls.is_empty() {
            out.push_str(&format!("{}: []\n", CALLS_KEY));
        } else {
            out.push_str(&format!("{}:\n", CALLS_KEY));
            for call in calls {
                out.push_str(&call.render_source_fragment());
            }
        }
        out
    }

    /// Writes the registry to `destination` if it is dirty.
    ///
    /// Returns `true` if the file was written. Parent directories are created
    /// as needed.
    pub fn persist(&mut self, destination: &Path) -> Result<bool> {
        if !self.dirty {
            debug!("Registry unchanged, not writing {}", destination.display());
            return Ok(false);
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let source = self.to_source();
        fs::write(destination, &source)?;
        self.dirty = false;

        info!(
            "Wrote {} calls ({} bytes) to {}",
            self.len(),
            source.len(),
            destination.display()
        );
        Ok(true)
    }
}
