//! `pkgmap resolve` and `pkgmap reverse` command implementations.

use miette::{IntoDiagnostic, Result};
use pkgmap_core::{Config, ForwardOptions, ReverseOptions, SubpathField};
use std::path::Path;

/// Run forward resolution of one entry point.
///
/// The field follows the entry point's prefix: `#` reads `imports`,
/// anything else reads `exports`.
pub fn run_forward(
    config: &Config,
    manifest: Option<&Path>,
    entry: &str,
    include_unsafe_fallbacks: bool,
) -> Result<()> {
    let maps = super::load_manifest(config, manifest)?;
    let field = SubpathField::for_entry_point(entry);
    let options = ForwardOptions::new(config.conditions.iter().cloned())
        .with_unsafe_fallback_targets(include_unsafe_fallbacks);

    let targets = maps.resolve_targets(field, entry, &options);
    tracing::debug!(
        entry,
        field = field.key(),
        conditions = ?options.conditions,
        count = targets.len(),
        "resolved entry point"
    );

    if config.json_logs {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "ok": true,
            "field": field.key(),
            "entry": entry,
            "conditions": options.conditions,
            "targets": targets,
        }))
        .into_diagnostic()?;
        println!("{json}");
    } else if targets.is_empty() {
        eprintln!(
            "No target for {entry} under [{}]",
            options.conditions.join(", ")
        );
    } else {
        for target in &targets {
            println!("{target}");
        }
    }

    Ok(())
}

/// A reverse query as given on the command line.
#[derive(Debug, Clone)]
pub struct ReverseQuery {
    pub field: SubpathField,
    /// `None` lists blocked entry points.
    pub target: Option<String>,
    pub include_unsafe_fallbacks: bool,
    pub keep_asterisks: bool,
}

/// Run reverse resolution of one target.
pub fn run_reverse(config: &Config, manifest: Option<&Path>, query: ReverseQuery) -> Result<()> {
    let maps = super::load_manifest(config, manifest)?;
    let options = ReverseOptions::new(config.conditions.iter().cloned())
        .with_unsafe_fallback_targets(query.include_unsafe_fallbacks)
        .with_replace_subpath_asterisks(!query.keep_asterisks);

    let entry_points = maps.resolve_entry_points(query.field, query.target.as_deref(), &options);
    tracing::debug!(
        wanted = query.target.as_deref().unwrap_or("null"),
        field = query.field.key(),
        conditions = ?options.conditions,
        count = entry_points.len(),
        "reverse resolved target"
    );

    if config.json_logs {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "ok": true,
            "field": query.field.key(),
            "target": query.target,
            "conditions": options.conditions,
            "entry_points": entry_points,
        }))
        .into_diagnostic()?;
        println!("{json}");
    } else if entry_points.is_empty() {
        eprintln!(
            "No entry point reaches {} under [{}]",
            query.target.as_deref().unwrap_or("null"),
            options.conditions.join(", ")
        );
    } else {
        for entry_point in &entry_points {
            println!("{entry_point}");
        }
    }

    Ok(())
}
