//! Subpath map flattening.
//!
//! Turns a nested [`SubpathMap`] into one [`SubpathMapping`] per terminal
//! leaf. Output order is depth-first, left-to-right traversal order, which is
//! the priority order used by resolution.

use serde::Serialize;

use super::map::{is_subpath_key, SubpathMap};

/// The catch-all condition.
pub const DEFAULT_CONDITION: &str = "default";

/// One elementary mapping from a subpath to a target under a set of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubpathMapping {
    /// Public entry point, normalized. `.` for the sugared single-entry form.
    pub subpath: String,
    /// Target file path, or `None` when blocked.
    pub target: Option<String>,
    /// Ordered, de-duplicated conditions leading to this leaf.
    pub conditions: Vec<String>,
    /// Sibling conditions that precede a `default` key on the path to this leaf.
    pub excluded_conditions: Vec<String>,
    /// The owning subpath was never an explicit key.
    pub is_sugared: bool,
    /// This leaf is, or descends from, a fallback array element.
    pub is_fallback: bool,
    /// First record with a non-null target in its fallback array.
    pub is_first_non_null_fallback: bool,
    /// Final record of its fallback array.
    pub is_last_fallback: bool,
    /// A `default` sibling precedes this leaf, so it can never be selected.
    pub is_dead_condition: bool,
    #[serde(skip)]
    pub(crate) fallback: Option<FallbackSlot>,
}

/// Bookkeeping for records that belong to a fallback array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FallbackSlot {
    /// Id of the outermost fallback array the record belongs to.
    pub group: usize,
    /// Whether the record is the array's safe-mode representative.
    pub selected: bool,
}

impl SubpathMapping {
    /// Eligibility under the fallback policy.
    ///
    /// Records outside any fallback array are always eligible. In safe mode
    /// only the array's representative is; unsafe mode also admits every
    /// non-null element.
    #[must_use]
    pub fn is_fallback_candidate(&self, include_unsafe: bool) -> bool {
        match self.fallback {
            None => true,
            Some(slot) => slot.selected || (include_unsafe && self.target.is_some()),
        }
    }

    /// Id of the outermost fallback array this record belongs to.
    #[must_use]
    pub fn fallback_group(&self) -> Option<usize> {
        self.fallback.map(|slot| slot.group)
    }
}

/// Normalize a subpath key. `./` is an alias of `.`.
#[must_use]
pub fn normalize_subpath(key: &str) -> String {
    if key == "./" {
        ".".to_string()
    } else {
        key.to_string()
    }
}

/// Flatten a raw subpath map. `None` yields an empty list.
#[must_use]
pub fn flatten(map: Option<&SubpathMap>) -> Vec<SubpathMapping> {
    let Some(map) = map else {
        return Vec::new();
    };

    let mut flattener = Flattener::default();

    match map {
        SubpathMap::Conditional(entries) if map.is_subpath_keyed() => entries
            .iter()
            .filter(|(key, _)| is_subpath_key(key))
            .flat_map(|(key, node)| {
                let ctx = Traversal::at_subpath(normalize_subpath(key), false);
                flattener.node(node, &ctx)
            })
            .collect(),
        _ => flattener.node(map, &Traversal::at_subpath(".".to_string(), true)),
    }
}

/// Immutable state carried down the recursion. Each child gets its own copy.
#[derive(Debug, Clone)]
struct Traversal {
    subpath: String,
    conditions: Vec<String>,
    excluded_conditions: Vec<String>,
    is_fallback: bool,
    is_dead_condition: bool,
    is_sugared: bool,
}

impl Traversal {
    fn at_subpath(subpath: String, is_sugared: bool) -> Self {
        Self {
            subpath,
            conditions: Vec::new(),
            excluded_conditions: Vec::new(),
            is_fallback: false,
            is_dead_condition: false,
            is_sugared,
        }
    }

    fn with_condition(&self, condition: &str) -> Self {
        let mut next = self.clone();
        if !next.conditions.iter().any(|c| c == condition) {
            next.conditions.push(condition.to_string());
        }
        next
    }

    fn excluding<'a>(mut self, conditions: impl IntoIterator<Item = &'a str>) -> Self {
        for condition in conditions {
            if !self.excluded_conditions.iter().any(|c| c == condition) {
                self.excluded_conditions.push(condition.to_string());
            }
        }
        self
    }

    fn dead(mut self) -> Self {
        self.is_dead_condition = true;
        self
    }

    fn in_fallback(&self) -> Self {
        let mut next = self.clone();
        next.is_fallback = true;
        next
    }

    fn emit(&self, target: Option<&String>) -> SubpathMapping {
        let conditions = if self.conditions.is_empty() {
            vec![DEFAULT_CONDITION.to_string()]
        } else {
            self.conditions.clone()
        };
        let excluded_conditions = self
            .excluded_conditions
            .iter()
            .filter(|c| !conditions.contains(c))
            .cloned()
            .collect();

        SubpathMapping {
            subpath: self.subpath.clone(),
            target: target.cloned(),
            conditions,
            excluded_conditions,
            is_sugared: self.is_sugared,
            is_fallback: self.is_fallback,
            is_first_non_null_fallback: false,
            is_last_fallback: false,
            is_dead_condition: self.is_dead_condition,
            fallback: None,
        }
    }
}

#[derive(Debug, Default)]
struct Flattener {
    next_group: usize,
}

impl Flattener {
    fn node(&mut self, node: &SubpathMap, ctx: &Traversal) -> Vec<SubpathMapping> {
        match node {
            SubpathMap::Leaf(target) => vec![ctx.emit(target.as_ref())],
            SubpathMap::Fallback(items) => self.fallback(items, ctx),
            SubpathMap::Conditional(entries) => self.conditional(entries, ctx),
        }
    }

    fn fallback(&mut self, items: &[SubpathMap], ctx: &Traversal) -> Vec<SubpathMapping> {
        let child = ctx.in_fallback();
        let mut records = Vec::new();
        for item in items {
            records.extend(self.node(item, &child));
        }

        let first_non_null = records.iter().position(|r| r.target.is_some());
        let last = records.len().checked_sub(1);
        let representative = first_non_null.or(last);

        // Only the outermost array opens a group; inner arrays are alternatives of it.
        let group = if ctx.is_fallback {
            None
        } else {
            let id = self.next_group;
            self.next_group += 1;
            Some(id)
        };

        for (i, record) in records.iter_mut().enumerate() {
            if Some(i) == first_non_null {
                record.is_first_non_null_fallback = true;
            }
            if Some(i) == last {
                record.is_last_fallback = true;
            }
            let selected = Some(i) == representative;
            record.fallback = Some(FallbackSlot {
                group: group
                    .or(record.fallback.map(|slot| slot.group))
                    .unwrap_or_default(),
                selected,
            });
        }

        records
    }

    fn conditional(
        &mut self,
        entries: &[(String, SubpathMap)],
        ctx: &Traversal,
    ) -> Vec<SubpathMapping> {
        let default_pos = entries.iter().position(|(key, _)| key == DEFAULT_CONDITION);
        let mut records = Vec::new();

        for (i, (key, node)) in entries.iter().enumerate() {
            let mut next = ctx.with_condition(key);
            match default_pos {
                Some(d) if i == d => {
                    next = next.excluding(entries[..d].iter().map(|(k, _)| k.as_str()));
                }
                Some(d) if i > d => next = next.dead(),
                _ => {}
            }
            records.extend(self.node(node, &next));
        }

        records
    }
}
