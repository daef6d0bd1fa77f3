//! Forward resolution: entry point to targets.

use super::flatten::{normalize_subpath, SubpathMapping};
use super::matching::{push_unique, select, substitute_target, Selection, SubpathTable};
use super::options::ForwardOptions;

/// Resolve which targets an entry point reaches under the given conditions.
///
/// The subpath is picked first (exact key, else the most specific matching
/// pattern), then its records are reduced under the conditions. An entry that
/// is unknown, unmatched or blocked resolves to an empty list.
#[must_use]
pub fn resolve_targets_from_entry_point(
    mappings: &[SubpathMapping],
    entry_point: &str,
    options: &ForwardOptions,
) -> Vec<String> {
    let table = SubpathTable::new(mappings);
    resolve_in_table(&table, entry_point, options)
}

pub(crate) fn resolve_in_table(
    table: &SubpathTable<'_>,
    entry_point: &str,
    options: &ForwardOptions,
) -> Vec<String> {
    let entry_point = normalize_subpath(entry_point);
    let Some((entry, captured)) = table.best_match(&entry_point) else {
        return Vec::new();
    };

    let Selection::Targets(records) = select(
        &entry.records,
        &options.conditions,
        options.include_unsafe_fallback_targets,
    ) else {
        return Vec::new();
    };

    let mut targets = Vec::with_capacity(records.len());
    for record in records {
        if let Some(target) = record.target.as_deref() {
            push_unique(&mut targets, substitute_target(target, captured));
        }
    }
    targets
}
