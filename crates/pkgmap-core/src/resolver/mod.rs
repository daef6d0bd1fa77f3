//! Package entry point resolution.
//!
//! Raw subpath maps (`exports` / `imports`) are parsed into [`SubpathMap`],
//! flattened into [`SubpathMapping`] records, and resolved in both
//! directions:
//! - forward: entry point to targets
//! - reverse: target to entry points
//!
//! Resolution honours ordered conditions, fallback arrays, single-wildcard
//! patterns with longest-prefix precedence, and dead `default` siblings.

mod flatten;
mod forward;
mod map;
pub mod matching;
mod options;
mod package;
mod reverse;

pub use flatten::{flatten, normalize_subpath, SubpathMapping, DEFAULT_CONDITION};
pub use forward::resolve_targets_from_entry_point;
pub use map::{is_subpath_key, SubpathMap};
pub use options::{ForwardOptions, ReverseOptions};
pub use package::{
    read_package_json, resolve_export_entry_points, resolve_export_targets,
    resolve_import_entry_points, resolve_import_targets, PackageSubpathMaps, SubpathField,
};
pub use reverse::resolve_entry_points_from_target;
