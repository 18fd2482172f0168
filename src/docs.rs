//! Rendering a registry as documentation and writing it out.

use crate::call::CallRecord;
use crate::config::DocFormat;
use crate::registry::CallRegistry;
use crate::serializers::{self, Scope};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Renders every call as ReST, sorted by path then method.
pub fn render_rest(registry: &CallRegistry) -> String {
    debug!("Rendering {} calls as ReST", registry.len());
    registry
        .sorted()
        .into_iter()
        .map(CallRecord::render_doc_fragment)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders every call as a JSON document, sorted by path then method.
pub fn render_json(registry: &CallRegistry) -> Result<String> {
    debug!("Rendering {} calls as JSON", registry.len());
    let calls: Vec<CallRecord> = registry.sorted().into_iter().cloned().collect();
    serializers::to_json(&calls, calls.len(), &Scope::default())
        .context("Failed to serialize API calls to JSON")
}

pub fn render(registry: &CallRegistry, format: DocFormat) -> Result<String> {
    match format {
        DocFormat::Rest => Ok(render_rest(registry)),
        DocFormat::Json => render_json(registry),
    }
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
