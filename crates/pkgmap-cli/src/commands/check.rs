//! `pkgmap check` command implementation.
//!
//! Exits with status 1 when any entry point is unreachable.

use miette::{IntoDiagnostic, Result};
use pkgmap_core::{check_entry_points, CheckOptions, CheckReport, Config};
use std::path::Path;

/// Run the check command.
pub fn run(config: &Config, manifest: Option<&Path>, condition_sets: &[String]) -> Result<()> {
    let maps = super::load_manifest(config, manifest)?;
    let options = parse_condition_sets(condition_sets);
    let report = check_entry_points(&maps, &options);

    tracing::debug!(
        entry_points = report.entry_points,
        errors = report.counts.error,
        warnings = report.counts.warn,
        "checked entry points"
    );

    if config.json_logs {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "ok": report.is_ok(),
            "check": report,
        }))
        .into_diagnostic()?;
        println!("{json}");
    } else {
        print_human(&report);
    }

    if !report.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

/// Each `--conditions` value is one comma-separated set.
fn parse_condition_sets(raw: &[String]) -> CheckOptions {
    if raw.is_empty() {
        return CheckOptions::default();
    }
    CheckOptions {
        condition_sets: raw
            .iter()
            .map(|set| {
                set.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect(),
    }
}

fn print_human(report: &CheckReport) {
    let name = report.package.as_deref().unwrap_or("<unnamed>");
    println!("{name}: {} entry point(s) checked", report.entry_points);

    for finding in &report.findings {
        let mut line = format!(
            "  {:<5} {} {}: {}",
            finding.severity.as_str(),
            finding.code,
            finding.subpath,
            finding.message
        );
        if let Some(target) = &finding.target {
            line.push_str(&format!(" ({target})"));
        }
        println!("{line}");
    }

    println!(
        "{} error(s), {} warning(s), {} note(s)",
        report.counts.error, report.counts.warn, report.counts.info
    );
}
