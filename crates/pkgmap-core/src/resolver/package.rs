//! Package-level entry points over a manifest's `exports` and `imports`.
//!
//! A manifest is parsed and flattened once; every query afterwards runs over
//! the memoized mapping lists.

use serde_json::Value;
use std::path::Path;

use super::flatten::{flatten, SubpathMapping};
use super::forward::resolve_targets_from_entry_point;
use super::map::SubpathMap;
use super::options::{ForwardOptions, ReverseOptions};
use super::reverse::resolve_entry_points_from_target;
use crate::error::Error;

/// Which subpath map of a manifest a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubpathField {
    /// `exports`: public entry points, keys start with `.`.
    #[default]
    Exports,
    /// `imports`: package-private specifiers, keys start with `#`.
    Imports,
}

impl SubpathField {
    /// Manifest key holding this map.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Exports => "exports",
            Self::Imports => "imports",
        }
    }

    /// Whether `entry_point` uses this map's key prefix.
    #[must_use]
    pub fn accepts(self, entry_point: &str) -> bool {
        match self {
            Self::Exports => entry_point.starts_with('.'),
            Self::Imports => entry_point.starts_with('#'),
        }
    }

    /// Pick the field an entry point belongs to by its prefix.
    #[must_use]
    pub fn for_entry_point(entry_point: &str) -> Self {
        if entry_point.starts_with('#') {
            Self::Imports
        } else {
            Self::Exports
        }
    }
}

impl std::fmt::Display for SubpathField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Flattened `exports` and `imports` of one package.
#[derive(Debug, Clone, Default)]
pub struct PackageSubpathMaps {
    /// Package name, when the manifest declares one.
    pub name: Option<String>,
    exports: Vec<SubpathMapping>,
    imports: Vec<SubpathMapping>,
    has_exports: bool,
    has_imports: bool,
}

impl PackageSubpathMaps {
    /// Parse and flatten the subpath maps of a manifest.
    pub fn from_package_json(pkg_json: &Value) -> Result<Self, Error> {
        let exports = parse_field(pkg_json, SubpathField::Exports)?;
        let imports = parse_field(pkg_json, SubpathField::Imports)?;

        Ok(Self {
            name: pkg_json
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            has_exports: exports.is_some(),
            has_imports: imports.is_some(),
            exports: flatten(exports.as_ref()),
            imports: flatten(imports.as_ref()),
        })
    }

    /// Read, parse and flatten a manifest file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::from_package_json(&read_package_json(path)?)
    }

    /// Whether the manifest declares the field at all.
    #[must_use]
    pub fn has_field(&self, field: SubpathField) -> bool {
        match field {
            SubpathField::Exports => self.has_exports,
            SubpathField::Imports => self.has_imports,
        }
    }

    /// The flattened mappings of a field.
    #[must_use]
    pub fn mappings(&self, field: SubpathField) -> &[SubpathMapping] {
        match field {
            SubpathField::Exports => &self.exports,
            SubpathField::Imports => &self.imports,
        }
    }

    /// Forward-resolve an entry point through a field.
    ///
    /// Entry points without the field's key prefix resolve to nothing.
    #[must_use]
    pub fn resolve_targets(
        &self,
        field: SubpathField,
        entry_point: &str,
        options: &ForwardOptions,
    ) -> Vec<String> {
        if !field.accepts(entry_point) {
            return Vec::new();
        }
        resolve_targets_from_entry_point(self.mappings(field), entry_point, options)
    }

    /// Reverse-resolve a target through a field.
    #[must_use]
    pub fn resolve_entry_points(
        &self,
        field: SubpathField,
        target: Option<&str>,
        options: &ReverseOptions,
    ) -> Vec<String> {
        resolve_entry_points_from_target(self.mappings(field), target, options)
    }
}

fn parse_field(pkg_json: &Value, field: SubpathField) -> Result<Option<SubpathMap>, Error> {
    pkg_json
        .get(field.key())
        .map(|value| SubpathMap::from_json_at(value, &format!("/{}", field.key())))
        .transpose()
}

/// Read and parse a package.json.
pub fn read_package_json(path: &Path) -> Result<Value, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Entry points of `exports` that reach `target`.
pub fn resolve_export_entry_points(
    pkg_json: &Value,
    target: Option<&str>,
    options: &ReverseOptions,
) -> Result<Vec<String>, Error> {
    let maps = PackageSubpathMaps::from_package_json(pkg_json)?;
    Ok(maps.resolve_entry_points(SubpathField::Exports, target, options))
}

/// Targets an `exports` entry point reaches.
pub fn resolve_export_targets(
    pkg_json: &Value,
    entry_point: &str,
    options: &ForwardOptions,
) -> Result<Vec<String>, Error> {
    let maps = PackageSubpathMaps::from_package_json(pkg_json)?;
    Ok(maps.resolve_targets(SubpathField::Exports, entry_point, options))
}

/// Specifiers of `imports` that reach `target`.
pub fn resolve_import_entry_points(
    pkg_json: &Value,
    target: Option<&str>,
    options: &ReverseOptions,
) -> Result<Vec<String>, Error> {
    let maps = PackageSubpathMaps::from_package_json(pkg_json)?;
    Ok(maps.resolve_entry_points(SubpathField::Imports, target, options))
}

/// Targets an `imports` specifier reaches.
pub fn resolve_import_targets(
    pkg_json: &Value,
    entry_point: &str,
    options: &ForwardOptions,
) -> Result<Vec<String>, Error> {
    let maps = PackageSubpathMaps::from_package_json(pkg_json)?;
    Ok(maps.resolve_targets(SubpathField::Imports, entry_point, options))
}
