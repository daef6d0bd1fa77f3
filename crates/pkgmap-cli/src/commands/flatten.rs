//! `pkgmap flatten` command implementation.
//!
//! Prints one line per elementary mapping, in priority order.

use miette::{IntoDiagnostic, Result};
use pkgmap_core::{Config, SubpathField, SubpathMapping};
use std::path::Path;

/// Run the flatten command.
pub fn run(config: &Config, manifest: Option<&Path>, field: SubpathField) -> Result<()> {
    let maps = super::load_manifest(config, manifest)?;
    let mappings = maps.mappings(field);

    if config.json_logs {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "ok": true,
            "package": maps.name,
            "field": field.key(),
            "mappings": mappings,
        }))
        .into_diagnostic()?;
        println!("{json}");
        return Ok(());
    }

    if mappings.is_empty() {
        println!("No \"{field}\" field.");
        return Ok(());
    }

    for mapping in mappings {
        println!("{}", format_mapping(mapping));
    }
    Ok(())
}

/// One human-readable line: `subpath -> target [conditions] flags`.
fn format_mapping(mapping: &SubpathMapping) -> String {
    let mut line = format!(
        "{} -> {} [{}]",
        mapping.subpath,
        mapping.target.as_deref().unwrap_or("null"),
        mapping.conditions.join(", ")
    );

    if !mapping.excluded_conditions.is_empty() {
        line.push_str(&format!(" excludes [{}]", mapping.excluded_conditions.join(", ")));
    }

    let flags: Vec<&str> = [
        (mapping.is_sugared, "sugared"),
        (mapping.is_fallback, "fallback"),
        (mapping.is_first_non_null_fallback, "first"),
        (mapping.is_last_fallback, "last"),
        (mapping.is_dead_condition, "dead"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();

    if !flags.is_empty() {
        line.push_str(&format!(" ({})", flags.join(", ")));
    }
    line
}
