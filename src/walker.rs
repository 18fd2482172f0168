//! Route discovery from a routing table.
//!
//! The routing table mirrors the host application's URL configuration: groups
//! that add a path prefix, plain views served on `GET`, and dispatchers that
//! serve different handlers per HTTP method. Patterns use regex syntax and
//! name their path parameters with capture groups:
//!
//! ```yaml
//! routes:
//!   - prefix: "^records/"
//!     routes:
//!       - pattern: "^(?P<record_id>[^/]+)$"
//!         handler: indivo::views::record
//!       - pattern: "^(?P<record_id>[^/]+)/notes/$"
//!         methods:
//!           GET: indivo::views::note_list
//!           POST: indivo::views::note_create
//! ```

use crate::access::AccessRuleLookup;
use crate::call::{CallRecord, HandlerRef, HttpMethod, ParamMap};
use crate::error::{Error, Result};
use crate::registry::CallRegistry;
use log::{debug, info, warn};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\?P?<([A-Za-z_][A-Za-z0-9_]*)>.*?\)").expect("param pattern is valid")
});

/// A node of the routing table.
///
/// The shape is picked from the keys present: `prefix` with `routes`, or
/// `pattern` with exactly one of `methods` and `handler`. Any other key, or a
/// mix of shapes, is an error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRouteNode")]
pub enum RouteNode {
    /// Nested routes sharing a path prefix
    Group {
        prefix: String,
        routes: Vec<RouteNode>,
    },
    /// A leaf dispatching to one handler per HTTP method
    Dispatcher {
        pattern: String,
        methods: BTreeMap<HttpMethod, HandlerRef>,
    },
    /// A leaf served by a single handler
    View { pattern: String, handler: HandlerRef },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRouteNode {
    prefix: Option<String>,
    routes: Option<Vec<RouteNode>>,
    pattern: Option<String>,
    methods: Option<BTreeMap<HttpMethod, HandlerRef>>,
    handler: Option<HandlerRef>,
}

impl TryFrom<RawRouteNode> for RouteNode {
    type Error = String;

    fn try_from(raw: RawRouteNode) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawRouteNode {
                prefix: Some(prefix),
                routes: Some(routes),
                pattern: None,
                methods: None,
                handler: None,
            } => Ok(RouteNode::Group { prefix, routes }),
            RawRouteNode {
                prefix: None,
                routes: None,
                pattern: Some(pattern),
                methods: Some(methods),
                handler: None,
            } => Ok(RouteNode::Dispatcher { pattern, methods }),
            RawRouteNode {
                prefix: None,
                routes: None,
                pattern: Some(pattern),
                methods: None,
                handler: Some(handler),
            } => Ok(RouteNode::View { pattern, handler }),
            RawRouteNode {
                prefix: Some(_),
                routes: None,
                ..
            } => Err("route group has `prefix` but no `routes`".to_string()),
            RawRouteNode {
                prefix: Some(_),
                ..
            }
            | RawRouteNode {
                routes: Some(_),
                ..
            } => Err("route group takes only `prefix` and `routes`".to_string()),
            RawRouteNode {
                pattern: Some(pattern),
                methods: Some(_),
                handler: Some(_),
                ..
            } => Err(format!(
                "route `{}` has both `methods` and `handler`; use one of them",
                pattern
            )),
            RawRouteNode {
                pattern: Some(pattern),
                ..
            } => Err(format!("route `{}` needs `methods` or `handler`", pattern)),
            RawRouteNode { .. } => {
                Err("route needs a `pattern` (leaf) or a `prefix` (group)".to_string())
            }
        }
    }
}

/// Root of a routing table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutingTable {
    #[serde(default)]
    pub routes: Vec<RouteNode>,
}

impl RoutingTable {
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading routing table from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Walks a routing table and registers one call per route.
pub struct RouteWalker<'r> {
    rules: &'r dyn AccessRuleLookup,
    registry: CallRegistry,
    duplicates: Vec<String>,
}

impl<'r> RouteWalker<'r> {
    pub fn new(rules: &'r dyn AccessRuleLookup) -> Self {
        Self {
            rules,
            registry: CallRegistry::new(),
            duplicates: Vec::new(),
        }
    }

    /// Registers every route under `routes`, rooted at `/`.
    pub fn walk(&mut self, routes: &[RouteNode]) -> &mut Self {
        self.walk_nodes(routes, "/");
        info!(
            "Discovered {} calls ({} duplicate titles)",
            self.registry.len(),
            self.duplicates.len()
        );
        self
    }

    /// Discovered call with the same title as `call`.
    pub fn lookup(&self, call: &CallRecord) -> Option<&CallRecord> {
        self.registry.get(&call.title())
    }

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> CallRegistry {
        self.registry
    }

    /// Titles defined more than once. The last definition was kept.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    fn walk_nodes(&mut self, nodes: &[RouteNode], parent: &str) {
        for node in nodes {
            match node {
                RouteNode::Group { prefix, routes } => {
                    let path = format!("{}{}", parent, strip_anchors(prefix, false));
                    debug!("Entering route group {}", path);
                    self.walk_nodes(routes, &path);
                }
                RouteNode::Dispatcher { pattern, methods } => {
                    let (path, params) = leaf_path(parent, pattern);
                    if methods.is_empty() {
                        debug!("Dispatcher at {} has no methods", path);
                    }
                    for (method, handler) in methods {
                        let call =
                            CallRecord::new(path.clone(), *method, handler.clone(), self.rules)
                                .with_url_params(params.clone());
                        self.register(call);
                    }
                }
                RouteNode::View { pattern, handler } => {
                    let (path, params) = leaf_path(parent, pattern);
                    let call = CallRecord::new(path, HttpMethod::Get, handler.clone(), self.rules)
                        .with_url_params(params);
                    self.register(call);
                }
            }
        }
    }

    fn register(&mut self, call: CallRecord) {
        let title = call.title();
        if self.registry.contains(&title) {
            warn!("Route {} is defined more than once; the last definition wins", title);
            self.duplicates.push(title);
        } else {
            debug!("Discovered {}", title);
        }
        self.registry.set(call);
    }
}

/// Full templated path of a leaf plus its (empty) url params.
fn leaf_path(parent: &str, pattern: &str) -> (String, ParamMap) {
    let raw = format!("{}{}", parent, strip_anchors(pattern, true));
    let (path, names) = template_path(&raw);
    let params = names.into_iter().map(|name| (name, String::new())).collect();
    (path, params)
}

fn strip_anchors(pattern: &str, leaf: bool) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    if leaf {
        pattern.strip_suffix('$').unwrap_or(pattern)
    } else {
        pattern
    }
}

/// Rewrites every named capture group as `{NAME}` and returns the names.
pub fn template_path(raw: &str) -> (String, Vec<String>) {
    let mut names = Vec::new();
    let path = PARAM_PATTERN.replace_all(raw, |caps: &Captures| {
        let name = caps[1].to_uppercase();
        let placeholder = format!("{{{}}}", name);
        names.push(name);
        placeholder
    });
    (path.into_owned(), names)
}
