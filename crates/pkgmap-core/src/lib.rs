#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Subpath map flattening and package entry point resolution.

pub mod check;
pub mod config;
pub mod error;
pub mod resolver;
pub mod version;

pub use check::{
    check_entry_points, codes as check_codes, CheckFinding, CheckOptions, CheckReport,
    CheckSeverity, PKG_CHECK_SCHEMA_VERSION,
};
pub use config::Config;
pub use error::Error;
pub use resolver::{
    flatten, read_package_json, resolve_entry_points_from_target, resolve_export_entry_points,
    resolve_export_targets, resolve_import_entry_points, resolve_import_targets,
    resolve_targets_from_entry_point, ForwardOptions, PackageSubpathMaps, ReverseOptions,
    SubpathField, SubpathMap, SubpathMapping,
};
pub use version::VERSION;
