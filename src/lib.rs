//! API doc generator - Documentation of a web application's API calls from its routing table.
//!
//! The generator discovers every call the application serves, merges what it
//! found with a hand-edited registry of descriptions, and renders the result
//! as ReST or JSON documentation.
//!
//! # Architecture
//!
//! 1. [`walker`] - Walks the routing table and discovers one call per route
//! 2. [`registry`] - Loads and persists the registry file of call descriptions
//! 3. [`reconcile`] - Merges discovered calls with saved ones, field by field
//! 4. [`call`] - The call record and its ReST / registry renderings
//! 5. [`access`] - Access-rule lookup for each call's handler
//! 6. [`docs`] - Whole-document rendering and output
//! 7. [`serializers`] - Serialization capabilities for data models
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_routes::{
//!     access::NoAccessRules,
//!     call::DefaultMaps,
//!     docs::render_rest,
//!     reconcile::{merge_registries, MergeOptions},
//!     registry::CallRegistry,
//!     walker::{RouteWalker, RoutingTable},
//! };
//! use std::path::Path;
//!
//! let table = RoutingTable::load(Path::new("routes.yaml")).unwrap();
//! let mut walker = RouteWalker::new(&NoAccessRules);
//! walker.walk(&table.routes);
//! let discovered = walker.into_registry();
//!
//! let registry_path = Path::new("doc/api.yaml");
//! let mut saved = CallRegistry::load_or_empty(registry_path, &NoAccessRules).unwrap();
//! merge_registries(&mut saved, &discovered, &DefaultMaps::new(), MergeOptions::default());
//! saved.persist(registry_path).unwrap();
//!
//! println!("{}", render_rest(&saved));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod access;
pub mod call;
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod reconcile;
pub mod registry;
pub mod serializers;
pub mod walker;
