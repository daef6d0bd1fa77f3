//! Matching primitives shared by forward and reverse resolution.
//!
//! Nothing here knows which direction a query runs in: condition matching,
//! single-wildcard capture and fallback reduction work the same whether the
//! query key is a subpath or a target.

use super::flatten::{SubpathMapping, DEFAULT_CONDITION};

/// Number of `*` wildcards in a subpath or target.
#[must_use]
pub fn asterisk_count(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'*').count()
}

/// Exactly one `*`.
#[must_use]
pub fn is_pattern(s: &str) -> bool {
    asterisk_count(s) == 1
}

/// Two or more `*`. Such subpaths never match anything.
#[must_use]
pub fn is_unmatchable(s: &str) -> bool {
    asterisk_count(s) > 1
}

/// Match a single-wildcard pattern against a literal.
///
/// Returns the text standing in for `*`. E.g. pattern `"./features/*.js"`
/// with `"./features/auth.js"` returns `Some("auth")`. Empty captures are
/// rejected.
#[must_use]
pub fn capture<'s>(pattern: &str, literal: &'s str) -> Option<&'s str> {
    let star_pos = pattern.find('*')?;
    let prefix = &pattern[..star_pos];
    let suffix = &pattern[star_pos + 1..];

    if !literal.starts_with(prefix) || !literal.ends_with(suffix) {
        return None;
    }

    let start = prefix.len();
    let end = literal.len().checked_sub(suffix.len())?;
    if start >= end {
        return None;
    }

    Some(&literal[start..end])
}

/// Replace the wildcard of a single-wildcard pattern with `captured`.
///
/// # Panics
/// Panics if the result does not capture back to `captured`. That would mean
/// the matching logic itself is broken.
#[must_use]
pub fn expand(pattern: &str, captured: &str) -> String {
    let expanded = pattern.replacen('*', captured, 1);
    assert_eq!(
        capture(pattern, &expanded),
        Some(captured),
        "wildcard substitution of {captured:?} into {pattern:?} did not round-trip"
    );
    expanded
}

/// Substitute a captured wildcard into a target.
///
/// Every `*` in the target is replaced, the way runtimes expand pattern
/// targets. Without a capture the target is returned as written.
#[must_use]
pub fn substitute_target(target: &str, captured: Option<&str>) -> String {
    match captured {
        Some(c) if is_pattern(target) => expand(target, c),
        Some(c) => target.replace('*', c),
        None => target.to_string(),
    }
}

/// Length of the literal text before `*`. Longer means more specific.
#[must_use]
pub fn pattern_prefix_len(pattern: &str) -> usize {
    pattern.find('*').unwrap_or(pattern.len())
}

/// A mapping's conditions match when each is `default` or wanted.
#[must_use]
pub fn matches_conditions(conditions: &[String], wanted: &[String]) -> bool {
    conditions
        .iter()
        .all(|c| c == DEFAULT_CONDITION || wanted.iter().any(|w| w == c))
}

/// All records of one subpath, in priority order.
#[derive(Debug, Clone)]
pub struct SubpathEntry<'a> {
    /// The subpath key as written, after `./` normalization.
    pub subpath: &'a str,
    /// Flattened records of the key, in document order.
    pub records: Vec<&'a SubpathMapping>,
}

/// Flattened mappings grouped by subpath in first-appearance order.
///
/// Subpaths with two or more wildcards are dropped here, so no query can
/// ever reach them.
#[derive(Debug, Clone, Default)]
pub struct SubpathTable<'a> {
    entries: Vec<SubpathEntry<'a>>,
}

impl<'a> SubpathTable<'a> {
    #[must_use]
    pub fn new(mappings: &'a [SubpathMapping]) -> Self {
        let mut entries: Vec<SubpathEntry<'a>> = Vec::new();
        for mapping in mappings {
            if is_unmatchable(&mapping.subpath) {
                continue;
            }
            match entries.iter_mut().find(|e| e.subpath == mapping.subpath) {
                Some(entry) => entry.records.push(mapping),
                None => entries.push(SubpathEntry {
                    subpath: &mapping.subpath,
                    records: vec![mapping],
                }),
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[SubpathEntry<'a>] {
        &self.entries
    }

    /// Find the subpath an entry point resolves through.
    ///
    /// An exact key wins. Otherwise the pattern with the longest literal
    /// prefix that captures the entry wins; ties keep the first one in
    /// document order. Returns the capture for pattern matches.
    #[must_use]
    pub fn best_match<'q>(&self, entry: &'q str) -> Option<(&SubpathEntry<'a>, Option<&'q str>)> {
        if let Some(exact) = self.entries.iter().find(|e| e.subpath == entry) {
            return Some((exact, None));
        }

        let mut best: Option<(&SubpathEntry<'a>, &'q str)> = None;
        for candidate in self.entries.iter().filter(|e| is_pattern(e.subpath)) {
            let Some(captured) = capture(candidate.subpath, entry) else {
                continue;
            };
            let better = best.map_or(true, |(current, _)| {
                pattern_prefix_len(candidate.subpath) > pattern_prefix_len(current.subpath)
            });
            if better {
                best = Some((candidate, captured));
            }
        }

        best.map(|(entry, captured)| (entry, Some(captured)))
    }
}

/// Outcome of reducing one subpath's records under a condition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    /// No record applies under the conditions.
    Unmatched,
    /// The winning record is an explicit `null` block.
    Blocked,
    /// Reachable records with non-null targets, in priority order.
    Targets(Vec<&'a SubpathMapping>),
}

/// Reduce a subpath's records to what the conditions actually reach.
///
/// Dead records never take part. The first eligible record whose conditions
/// match wins. In unsafe mode the remaining non-null members of the winner's
/// fallback array follow it.
#[must_use]
pub fn select<'a>(
    records: &[&'a SubpathMapping],
    conditions: &[String],
    include_unsafe: bool,
) -> Selection<'a> {
    let mut candidates = records.iter().copied().filter(|r| {
        !r.is_dead_condition
            && r.is_fallback_candidate(include_unsafe)
            && matches_conditions(&r.conditions, conditions)
    });

    let Some(winner) = candidates.next() else {
        return Selection::Unmatched;
    };
    if winner.target.is_none() {
        return Selection::Blocked;
    }

    let mut selected = vec![winner];
    if include_unsafe {
        if let Some(group) = winner.fallback_group() {
            selected.extend(
                candidates.filter(|r| r.fallback_group() == Some(group) && r.target.is_some()),
            );
        }
    }
    Selection::Targets(selected)
}

/// Push `value` unless already present, keeping first-seen order.
pub(crate) fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}
