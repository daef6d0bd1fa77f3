//! Command implementations for the `pkgmap` binary.

pub mod check;
pub mod flatten;
pub mod resolve;
pub mod version;

use miette::{IntoDiagnostic, Result};
use pkgmap_core::{Config, PackageSubpathMaps};
use std::path::Path;

/// Load and flatten the manifest a command runs against.
///
/// In JSON mode a failure prints the error envelope to stdout and exits with
/// status 1, so callers always get a parseable response.
pub fn load_manifest(config: &Config, manifest: Option<&Path>) -> Result<PackageSubpathMaps> {
    let path = config.manifest_path(manifest);
    tracing::debug!(path = %path.display(), "loading manifest");

    match PackageSubpathMaps::from_path(&path) {
        Ok(maps) => {
            tracing::debug!(
                package = maps.name.as_deref().unwrap_or("<unnamed>"),
                exports = maps.mappings(pkgmap_core::SubpathField::Exports).len(),
                imports = maps.mappings(pkgmap_core::SubpathField::Imports).len(),
                "flattened manifest"
            );
            Ok(maps)
        }
        Err(e) if config.json_logs => {
            print_error(e.code(), &e.to_string());
            std::process::exit(1);
        }
        Err(e) => Err(e).into_diagnostic(),
    }
}

/// Print the JSON error envelope.
pub fn print_error(code: &str, message: &str) {
    println!(
        "{}",
        serde_json::json!({
            "ok": false,
            "error": {
                "code": code,
                "message": message
            }
        })
    );
}
