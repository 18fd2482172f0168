//! API doc generator - Command-line tool documenting a web application's API calls.
//!
//! Walks the routing table named in the config file, merges the discovered
//! calls into the hand-edited registry file, rewrites the registry when it
//! changed, and renders the docs.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-routes [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Generate ReST docs to stdout:
//! ```bash
//! apidoc-from-routes -c doc/apidoc.yaml
//! ```
//!
//! Generate JSON docs and drop registry entries for removed routes:
//! ```bash
//! apidoc-from-routes -c doc/apidoc.yaml -f json -o api.json --prune
//! ```

use anyhow::Result;
use apidoc_from_routes::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once so the verbose flag is known before the logger exists
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API doc generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("API documentation generated successfully");

    Ok(())
}
