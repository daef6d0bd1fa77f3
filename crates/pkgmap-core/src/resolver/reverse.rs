//! Reverse resolution: target to the entry points that reach it.

use super::flatten::SubpathMapping;
use super::forward::resolve_in_table;
use super::matching::{capture, expand, is_pattern, push_unique, select, Selection, SubpathTable};
use super::options::{ForwardOptions, ReverseOptions};

/// Resolve which entry points reach `target` under the given conditions.
///
/// With `target = None` the subpaths explicitly blocked under the conditions
/// are returned instead.
///
/// A candidate is kept only if forward resolution of that entry point
/// through the same conditions reaches `target` again. That drops entry
/// points masked by a `null` mapping at the same or a more specific subpath,
/// and entry points claimed by a more specific subpath.
///
/// Entry points expanded from a pattern subpath are also dropped when any
/// subpath blocked under the conditions names them, exactly or as a
/// pattern, however broad that pattern is.
///
/// If `target` itself contains `*`, pattern subpaths are returned as
/// written.
#[must_use]
pub fn resolve_entry_points_from_target(
    mappings: &[SubpathMapping],
    target: Option<&str>,
    options: &ReverseOptions,
) -> Vec<String> {
    let table = SubpathTable::new(mappings);
    let selections: Vec<_> = table
        .entries()
        .iter()
        .map(|entry| {
            let selection = select(
                &entry.records,
                &options.conditions,
                options.include_unsafe_fallback_targets,
            );
            (entry.subpath, selection)
        })
        .collect();
    let blocked: Vec<&str> = selections
        .iter()
        .filter(|(_, selection)| *selection == Selection::Blocked)
        .map(|(subpath, _)| *subpath)
        .collect();

    let Some(query) = target else {
        let mut entry_points = Vec::new();
        for subpath in blocked {
            push_unique(&mut entry_points, subpath.to_string());
        }
        return entry_points;
    };

    let forward = options.forward();
    let mut entry_points = Vec::new();

    for (subpath, selection) in &selections {
        let Selection::Targets(records) = selection else {
            continue;
        };
        for mapped in records.iter().filter_map(|r| r.target.as_deref()) {
            let candidate = Candidate::new(subpath, mapped, query, options);
            if let Some(entry_point) = candidate.verify(&table, &blocked, query, &forward) {
                push_unique(&mut entry_points, entry_point);
            }
        }
    }

    entry_points
}

/// Whether a blocked subpath names `entry_point`, exactly or as a pattern.
fn is_masked(blocked: &[&str], entry_point: &str) -> bool {
    blocked.iter().any(|null_subpath| {
        *null_subpath == entry_point || capture(null_subpath, entry_point).is_some()
    })
}

/// A subpath that may reach the queried target, before verification.
enum Candidate {
    /// The mapping does not reach the target.
    Miss,
    /// Returned as written, without forward verification.
    AsWritten(String),
    /// `verify_as` must forward-resolve to the target; `report` is returned.
    /// `expanded` marks entry points derived from a pattern subpath.
    Checked {
        verify_as: String,
        report: String,
        expanded: bool,
    },
}

impl Candidate {
    fn new(subpath: &str, mapped: &str, query: &str, options: &ReverseOptions) -> Self {
        if query.contains('*') {
            let hit = mapped == query || (is_pattern(mapped) && capture(mapped, query).is_some());
            return if hit {
                Self::AsWritten(subpath.to_string())
            } else {
                Self::Miss
            };
        }

        if mapped == query {
            // A pattern subpath with a fixed target: every expansion reaches
            // the target, none can be named.
            return if is_pattern(subpath) {
                Self::AsWritten(subpath.to_string())
            } else {
                Self::Checked {
                    verify_as: subpath.to_string(),
                    report: subpath.to_string(),
                    expanded: false,
                }
            };
        }

        if !is_pattern(mapped) || !is_pattern(subpath) {
            return Self::Miss;
        }
        let Some(captured) = capture(mapped, query) else {
            return Self::Miss;
        };

        let expanded = expand(subpath, captured);
        let report = if options.replace_subpath_asterisks {
            expanded.clone()
        } else {
            subpath.to_string()
        };
        Self::Checked {
            verify_as: expanded,
            report,
            expanded: true,
        }
    }

    fn verify(
        self,
        table: &SubpathTable<'_>,
        blocked: &[&str],
        query: &str,
        forward: &ForwardOptions,
    ) -> Option<String> {
        match self {
            Self::Miss => None,
            Self::AsWritten(subpath) => Some(subpath),
            Self::Checked {
                verify_as,
                report,
                expanded,
            } => {
                if expanded && is_masked(blocked, &verify_as) {
                    return None;
                }
                resolve_in_table(table, &verify_as, forward)
                    .iter()
                    .any(|t| t == query)
                    .then_some(report)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{flatten, resolve_targets_from_entry_point, SubpathMap};
    use serde_json::{json, Value};

    fn mappings(value: &Value) -> Vec<SubpathMapping> {
        flatten(Some(&SubpathMap::from_json(value).unwrap()))
    }

    fn reverse(value: &Value, target: &str, conditions: &[&str]) -> Vec<String> {
        resolve_entry_points_from_target(
            &mappings(value),
            Some(target),
            &ReverseOptions::new(conditions.iter().copied()),
        )
    }

    #[test]
    fn test_literal_reverse() {
        let exports = json!({
            ".": "./index.js",
            "./feature": { "import": "./feature.mjs", "default": "./feature.js" }
        });
        assert_eq!(reverse(&exports, "./index.js", &[]), vec!["."]);
        assert_eq!(reverse(&exports, "./feature.mjs", &["import"]), vec!["./feature"]);
        assert_eq!(reverse(&exports, "./feature.js", &[]), vec!["./feature"]);
        // "import" pre-empts the default branch.
        assert!(reverse(&exports, "./feature.js", &["import"]).is_empty());
        assert!(reverse(&exports, "./missing.js", &[]).is_empty());
    }

    #[test]
    fn test_multiple_subpaths_same_target() {
        let exports = json!({
            ".": "./index.js",
            "./main": "./index.js",
            "./other": "./other.js"
        });
        assert_eq!(reverse(&exports, "./index.js", &[]), vec![".", "./main"]);
    }

    #[test]
    fn test_pattern_reverse_replaces_asterisk() {
        let exports = json!({ "./p/*.js": "./features/*.js" });
        assert_eq!(
            reverse(&exports, "./features/file.js", &[]),
            vec!["./p/file.js"]
        );
    }

    #[test]
    fn test_pattern_reverse_keeps_asterisk_when_asked() {
        let exports = json!({ "./p/*.js": "./features/*.js" });
        let options = ReverseOptions::default().with_replace_subpath_asterisks(false);
        assert_eq!(
            resolve_entry_points_from_target(&mappings(&exports), Some("./features/file.js"), &options),
            vec!["./p/*.js"]
        );
    }

    #[test]
    fn test_pattern_target_query_returns_pattern_subpath() {
        let exports = json!({
            "./p/*.js": "./features/*.js",
            "./q/*": "./other/*"
        });
        assert_eq!(reverse(&exports, "./features/*.js", &[]), vec!["./p/*.js"]);
    }

    #[test]
    fn test_null_masking_same_subpath() {
        let exports = json!({
            "./x": { "import": "./x.js" },
            "./x/null": { "import": null, "require": "./x.js" }
        });
        assert_eq!(reverse(&exports, "./x.js", &["import", "require"]), vec!["./x"]);
        assert_eq!(reverse(&exports, "./x.js", &["require"]), vec!["./x/null"]);
    }

    #[test]
    fn test_null_masking_by_specific_pattern() {
        let exports = json!({
            "./*": "./src/*.js",
            "./internal/*": null
        });
        assert!(reverse(&exports, "./src/internal/secret.js", &[]).is_empty());
        assert_eq!(reverse(&exports, "./src/public.js", &[]), vec!["./public"]);
    }

    #[test]
    fn test_null_masking_by_broader_pattern() {
        let exports = json!({
            "./a/*": "./src/a/*.js",
            "./*": null
        });
        assert!(reverse(&exports, "./src/a/x.js", &[]).is_empty());
        // Forward resolution still prefers the more specific key.
        assert_eq!(
            resolve_targets_from_entry_point(&mappings(&exports), "./a/x", &ForwardOptions::default()),
            vec!["./src/a/x.js"]
        );
    }

    #[test]
    fn test_null_masking_by_tied_pattern_declared_later() {
        let exports = json!({
            "./p/*": "./f/*.js",
            "./p/*.js": null
        });
        assert!(reverse(&exports, "./f/x.js.js", &[]).is_empty());
        assert_eq!(reverse(&exports, "./f/x.js", &[]), vec!["./p/x"]);
    }

    #[test]
    fn test_null_masking_only_under_matching_conditions() {
        let exports = json!({
            "./lib/*": "./dist/*.js",
            "./*": { "browser": null, "default": "./src/*.js" }
        });
        assert_eq!(reverse(&exports, "./dist/x.js", &[]), vec!["./lib/x"]);
        assert!(reverse(&exports, "./dist/x.js", &["browser"]).is_empty());
    }

    #[test]
    fn test_null_sibling_not_selected_does_not_mask() {
        let exports = json!({
            "./p/*": { "import": "./f/*.js", "node": null }
        });
        assert_eq!(reverse(&exports, "./f/x.js", &["import", "node"]), vec!["./p/x"]);
    }

    #[test]
    fn test_broad_null_keeps_literal_entries() {
        let exports = json!({
            "./feature": "./feature.js",
            "./*": null
        });
        assert_eq!(reverse(&exports, "./feature.js", &[]), vec!["./feature"]);
    }

    #[test]
    fn test_more_specific_subpath_claims_entry() {
        let exports = json!({
            "./*": "./dist/*.js",
            "./special": "./special/index.js"
        });
        // "./special" is claimed by its exact key, so the pattern cannot name it.
        assert!(reverse(&exports, "./dist/special.js", &[]).is_empty());
        assert_eq!(reverse(&exports, "./special/index.js", &[]), vec!["./special"]);
    }

    #[test]
    fn test_overlapping_patterns_collapse() {
        let exports = json!({
            "./a/*": "./dist/*.js",
            "./a/deep/*": "./dist/deep/*.js"
        });
        assert_eq!(
            reverse(&exports, "./dist/deep/x.js", &[]),
            vec!["./a/deep/x"]
        );
    }

    #[test]
    fn test_pattern_with_fixed_target() {
        let exports = json!({ "./legacy/*": "./legacy.js" });
        assert_eq!(reverse(&exports, "./legacy.js", &[]), vec!["./legacy/*"]);
    }

    #[test]
    fn test_dead_condition_not_reverse_resolved() {
        let exports = json!({ "default": "./d.js", "custom": "./c.js" });
        assert!(reverse(&exports, "./c.js", &["custom"]).is_empty());
        assert_eq!(reverse(&exports, "./d.js", &["custom"]), vec!["."]);
    }

    #[test]
    fn test_fallback_reverse_safe_and_unsafe() {
        let exports = json!({ "./multi": ["./a.js", "./b.js", "./c.js"] });
        let flat = mappings(&exports);

        let safe = ReverseOptions::default();
        assert_eq!(
            resolve_entry_points_from_target(&flat, Some("./a.js"), &safe),
            vec!["./multi"]
        );
        assert!(resolve_entry_points_from_target(&flat, Some("./b.js"), &safe).is_empty());

        let unsafe_all = ReverseOptions::default().with_unsafe_fallback_targets(true);
        assert_eq!(
            resolve_entry_points_from_target(&flat, Some("./c.js"), &unsafe_all),
            vec!["./multi"]
        );
    }

    #[test]
    fn test_null_query_lists_blocked_subpaths() {
        let exports = json!({
            ".": "./index.js",
            "./internal/*": null,
            "./env": { "node": null, "default": "./env.js" },
            "./gone": [null, null]
        });
        let flat = mappings(&exports);
        assert_eq!(
            resolve_entry_points_from_target(&flat, None, &ReverseOptions::new(["node"])),
            vec!["./internal/*", "./env", "./gone"]
        );
        assert_eq!(
            resolve_entry_points_from_target(&flat, None, &ReverseOptions::default()),
            vec!["./internal/*", "./gone"]
        );
    }

    #[test]
    fn test_multi_asterisk_never_reported() {
        let exports = json!({
            "./bad/*/*": "./bad/*.js",
            "./bad2/*/*": null
        });
        assert!(reverse(&exports, "./bad/x.js", &[]).is_empty());
        assert!(reverse(&exports, "./bad/*.js", &[]).is_empty());
        assert!(resolve_entry_points_from_target(&mappings(&exports), None, &ReverseOptions::default()).is_empty());
    }

    #[test]
    fn test_literal_round_trip() {
        let exports = json!({
            ".": { "types": "./index.d.ts", "import": "./index.mjs", "default": "./index.js" },
            "./utils": { "node": { "require": "./utils.cjs" }, "default": "./utils.js" },
            "./multi": [null, "./m.js"]
        });
        let flat = mappings(&exports);

        let cases: &[(&str, &[&str])] = &[
            (".", &["types"]),
            (".", &["import"]),
            (".", &[]),
            ("./utils", &["node", "require"]),
            ("./utils", &["node"]),
            ("./multi", &[]),
        ];

        for (entry, conditions) in cases {
            let forward = ForwardOptions::new(conditions.iter().copied());
            let targets = resolve_targets_from_entry_point(&flat, entry, &forward);
            assert_eq!(targets.len(), 1, "{entry} under {conditions:?}");
            let back = resolve_entry_points_from_target(
                &flat,
                Some(&targets[0]),
                &ReverseOptions::new(conditions.iter().copied()),
            );
            assert!(back.iter().any(|e| e.as_str() == *entry), "{entry} under {conditions:?}: {back:?}");
        }
    }
}
