use crate::config::{DocFormat, GeneratorConfig};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// API doc generator - Documents every route of a web application from its routing table
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Generator configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = "apidoc.yaml")]
    pub config: PathBuf,

    /// Docs output file (overrides `docs_output`; stdout if neither is set)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Docs format (overrides `format`)
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<DocFormat>,

    /// Let discovered text win over hand-edited text
    #[arg(long = "prefer-discovered")]
    pub prefer_discovered: bool,

    /// Remove registry entries that no longer match a route
    #[arg(long = "prune")]
    pub prune: bool,

    /// Never rewrite the registry file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.config.is_file() {
        anyhow::bail!("Config file does not exist: {}", args.config.display());
    }

    info!("Config file: {}", args.config.display());
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    }
    if args.dry_run {
        info!("Dry run: the registry file will not be written");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::docs::{render, write_to_file};
    use crate::reconcile::{merge_registries, MergeOptions};
    use crate::registry::CallRegistry;
    use crate::walker::{RouteWalker, RoutingTable};

    // Step 1: Load configuration
    let config = GeneratorConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    let rules = config.access_rules();
    info!("Loaded {} access rules", rules.len());

    // Step 2: Discover routes
    info!("Walking routing table {}", config.routes.display());
    let table = RoutingTable::load(&config.routes)
        .with_context(|| format!("Failed to load routing table {}", config.routes.display()))?;
    let mut walker = RouteWalker::new(&rules);
    walker.walk(&table.routes);
    let duplicates = walker.duplicates().len();
    let discovered = walker.into_registry();

    if discovered.is_empty() {
        log::warn!("No routes found in the routing table");
    }

    // Step 3: Load the saved registry; a missing file means a first run
    let mut registry = CallRegistry::load_or_empty(&config.registry, &rules)?;

    // Step 4: Reconcile
    let options = MergeOptions {
        prefer_saved: config.prefer_saved && !args.prefer_discovered,
        prune: args.prune,
    };
    debug!("Merge options: {:?}", options);
    let summary = merge_registries(&mut registry, &discovered, &config.defaults, options);

    // Step 5: Persist the registry if anything changed
    if args.dry_run {
        info!("Dry run: registry dirty = {}", registry.is_dirty());
    } else {
        let written = registry.persist(&config.registry).with_context(|| {
            format!("Failed to write registry {}", config.registry.display())
        })?;
        if !written {
            info!("Registry {} is up to date", config.registry.display());
        }
    }

    // Step 6: Render docs
    let format = args.format.unwrap_or(config.format);
    info!("Rendering docs as {:?}...", format);
    let content = render(&registry, format)?;

    match args.output_path.as_ref().or(config.docs_output.as_ref()) {
        Some(output_path) => {
            info!("Writing output to: {}", output_path.display());
            write_to_file(&content, output_path)?;
        }
        None => println!("{}", content),
    }

    // Step 7: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Routes discovered: {}", discovered.len());
    info!("  - Duplicate titles: {}", duplicates);
    info!("  - Calls added: {}", summary.added);
    info!("  - Calls updated: {}", summary.updated);
    info!("  - Calls unchanged: {}", summary.unchanged);
    info!(
        "  - Stale calls: {}{}",
        summary.stale.len(),
        if summary.pruned { " (pruned)" } else { "" }
    );

    Ok(())
}
