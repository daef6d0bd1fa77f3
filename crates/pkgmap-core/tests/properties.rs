//! Integration tests for the resolution properties of flattened subpath maps.
//!
//! Each test builds a manifest with `serde_json::json!` and drives the public
//! API the way a linter or workspace tool would.

use pkgmap_core::{
    flatten, resolve_entry_points_from_target, resolve_export_entry_points,
    resolve_export_targets, resolve_targets_from_entry_point, ForwardOptions,
    PackageSubpathMaps, ReverseOptions, SubpathField, SubpathMap, SubpathMapping,
};
use serde_json::{json, Value};

fn flat(value: &Value) -> Vec<SubpathMapping> {
    flatten(Some(&SubpathMap::from_json(value).unwrap()))
}

fn forward(conditions: &[&str]) -> ForwardOptions {
    ForwardOptions::new(conditions.iter().copied())
}

fn reverse(conditions: &[&str]) -> ReverseOptions {
    ReverseOptions::new(conditions.iter().copied())
}

fn realistic_exports() -> Value {
    json!({
        ".": {
            "types": "./dist/index.d.ts",
            "node": {
                "import": "./dist/node/index.mjs",
                "require": "./dist/node/index.cjs"
            },
            "import": "./dist/index.mjs",
            "default": "./dist/index.js"
        },
        "./package.json": "./package.json",
        "./utils": ["./dist/utils.modern.js", "./dist/utils.js"],
        "./components/*.js": {
            "types": "./dist/components/*.d.ts",
            "default": "./dist/components/*.js"
        },
        "./components/internal/*.js": null,
        "./legacy": { "default": "./dist/legacy.js", "browser": "./dist/legacy.browser.js" },
        "./broken/*/*": "./dist/broken/*.js"
    })
}

#[test]
fn test_flatten_determinism() {
    let value = realistic_exports();
    let first = flat(&value);
    let second = flat(&value);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_flatten_order_within_subpath_is_traversal_order() {
    let mappings = flat(&realistic_exports());
    let root: Vec<_> = mappings
        .iter()
        .filter(|m| m.subpath == ".")
        .map(|m| m.target.as_deref().unwrap())
        .collect();
    assert_eq!(
        root,
        vec![
            "./dist/index.d.ts",
            "./dist/node/index.mjs",
            "./dist/node/index.cjs",
            "./dist/index.mjs",
            "./dist/index.js",
        ]
    );
}

#[test]
fn test_literal_round_trip() {
    let mappings = flat(&realistic_exports());
    let condition_sets: &[&[&str]] = &[
        &[],
        &["types"],
        &["node", "import"],
        &["node", "require"],
        &["import"],
        &["browser"],
    ];

    for conditions in condition_sets {
        for entry in [".", "./package.json", "./utils", "./legacy"] {
            let targets =
                resolve_targets_from_entry_point(&mappings, entry, &forward(conditions));
            for target in &targets {
                let back =
                    resolve_entry_points_from_target(&mappings, Some(target), &reverse(conditions));
                assert!(
                    back.iter().any(|e| e == entry),
                    "{entry} -> {target} under {conditions:?} reversed to {back:?}"
                );
            }
        }
    }
}

#[test]
fn test_fallback_safe_mode() {
    let mappings = flat(&json!({ "./multi": ["./a.js", "./b.js", "./c.js"] }));

    assert_eq!(
        resolve_targets_from_entry_point(&mappings, "./multi", &ForwardOptions::default()),
        vec!["./a.js"]
    );
    assert_eq!(
        resolve_targets_from_entry_point(
            &mappings,
            "./multi",
            &ForwardOptions::default().with_unsafe_fallback_targets(true)
        ),
        vec!["./a.js", "./b.js", "./c.js"]
    );
}

#[test]
fn test_null_masking() {
    let mappings = flat(&json!({
        "./x": { "import": "./x.js" },
        "./x/null": { "import": null, "require": "./x.js" }
    }));

    let both = resolve_entry_points_from_target(
        &mappings,
        Some("./x.js"),
        &reverse(&["import", "require"]),
    );
    assert_eq!(both, vec!["./x"]);
}

#[test]
fn test_null_masking_of_pattern_expansion() {
    let mappings = flat(&realistic_exports());
    assert!(resolve_entry_points_from_target(
        &mappings,
        Some("./dist/components/internal/secret.js"),
        &reverse(&[]),
    )
    .is_empty());
    assert_eq!(
        resolve_entry_points_from_target(
            &mappings,
            Some("./dist/components/button.js"),
            &reverse(&[]),
        ),
        vec!["./components/button.js"]
    );
}

#[test]
fn test_dead_condition() {
    let mappings = flat(&json!({ "default": "./d.js", "custom": "./c.js" }));

    assert!(
        resolve_entry_points_from_target(&mappings, Some("./c.js"), &reverse(&["custom"]))
            .is_empty()
    );
    assert_eq!(
        resolve_targets_from_entry_point(&mappings, ".", &forward(&["custom"])),
        vec!["./d.js"]
    );
}

#[test]
fn test_pattern_capture_consistency() {
    let mappings = flat(&json!({ "./p/*.js": "./features/*.js" }));

    assert_eq!(
        resolve_targets_from_entry_point(&mappings, "./p/file.js", &forward(&[])),
        vec!["./features/file.js"]
    );
    assert_eq!(
        resolve_entry_points_from_target(&mappings, Some("./features/file.js"), &reverse(&[])),
        vec!["./p/file.js"]
    );
}

#[test]
fn test_multi_asterisk_rejection() {
    let mappings = flat(&realistic_exports());
    let queries = ["./broken/a/b", "./broken/*/*", "./dist/broken/a.js"];

    for conditions in [&[][..], &["node"][..]] {
        for query in queries {
            for target in resolve_targets_from_entry_point(&mappings, query, &forward(conditions)) {
                assert!(!target.contains("broken"), "{query} resolved to {target}");
            }
            for options in [
                reverse(conditions),
                reverse(conditions).with_unsafe_fallback_targets(true),
                reverse(conditions).with_replace_subpath_asterisks(false),
            ] {
                let entries = resolve_entry_points_from_target(&mappings, Some(query), &options);
                assert!(entries.iter().all(|e| !e.starts_with("./broken")));
            }
        }
        let blocked = resolve_entry_points_from_target(&mappings, None, &reverse(conditions));
        assert!(blocked.iter().all(|e| !e.starts_with("./broken")));
    }
}

#[test]
fn test_best_match_precedence() {
    let mappings = flat(&json!({
        "./a/*.js": "./shallow/*.js",
        "./a/deep/*.js": "./deep/*.js"
    }));
    assert_eq!(
        resolve_targets_from_entry_point(&mappings, "./a/deep/x.js", &forward(&[])),
        vec!["./deep/x.js"]
    );
}

#[test]
fn test_package_level_operations() {
    let pkg = json!({
        "name": "@scope/lib",
        "exports": realistic_exports(),
        "imports": {
            "#env": { "node": "./src/env.node.js", "default": "./src/env.js" },
            "#utils/*": "./src/utils/*.js"
        }
    });

    assert_eq!(
        resolve_export_targets(&pkg, "./components/card.js", &forward(&["types"])).unwrap(),
        vec!["./dist/components/card.d.ts"]
    );
    assert_eq!(
        resolve_export_entry_points(&pkg, Some("./dist/index.mjs"), &reverse(&["import"]))
            .unwrap(),
        vec!["."]
    );

    let maps = PackageSubpathMaps::from_package_json(&pkg).unwrap();
    assert_eq!(
        maps.resolve_targets(SubpathField::Imports, "#env", &forward(&["node"])),
        vec!["./src/env.node.js"]
    );
    assert_eq!(
        maps.resolve_entry_points(
            SubpathField::Imports,
            Some("./src/utils/strings.js"),
            &reverse(&[])
        ),
        vec!["#utils/strings"]
    );
}
