//! Entry point reachability check.
//!
//! Forward-resolves every declared literal `exports` subpath under a list of
//! condition sets and reports what a structural linter needs to flag.
//! Problems are reported as findings, never as errors. Whether the resolved
//! files exist on disk is left to the caller.
//!
//! # Sort Order
//!
//! Findings are sorted by `severity_rank` desc (error=3, warn=2, info=1),
//! then `code`, then `subpath`, then document order.

use serde::Serialize;

use crate::resolver::matching::{is_pattern, is_unmatchable, SubpathTable};
use crate::resolver::{
    resolve_targets_from_entry_point, ForwardOptions, PackageSubpathMaps, SubpathField,
    SubpathMapping,
};

/// Schema version for check report output.
pub const PKG_CHECK_SCHEMA_VERSION: u32 = 1;

/// Check finding codes.
pub mod codes {
    pub const ENTRY_UNREACHABLE: &str = "ENTRY_UNREACHABLE";
    pub const ENTRY_DEAD_CONDITION: &str = "ENTRY_DEAD_CONDITION";
    pub const ENTRY_MULTI_WILDCARD: &str = "ENTRY_MULTI_WILDCARD";
    pub const ENTRY_UNSAFE_FALLBACK: &str = "ENTRY_UNSAFE_FALLBACK";
}

/// Severity levels for check findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckSeverity {
    #[default]
    Info,
    Warn,
    Error,
}

impl CheckSeverity {
    /// Convert to string for JSON serialization.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Numeric rank for deterministic sorting. Higher sorts first.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Error => 3,
            Self::Warn => 2,
            Self::Info => 1,
        }
    }
}

impl Serialize for CheckSeverity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single check finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFinding {
    /// Stable finding code.
    pub code: &'static str,
    pub severity: CheckSeverity,
    /// Human-readable message.
    pub message: String,
    /// Subpath the finding is about.
    pub subpath: String,
    /// Condition set or mapping conditions involved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    /// Target involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CheckFinding {
    fn new(
        code: &'static str,
        severity: CheckSeverity,
        subpath: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            subpath: subpath.to_string(),
            conditions: Vec::new(),
            target: None,
        }
    }

    fn with_conditions(mut self, conditions: &[String]) -> Self {
        self.conditions = conditions.to_vec();
        self
    }

    fn with_target(mut self, target: Option<&str>) -> Self {
        self.target = target.map(str::to_string);
        self
    }
}

/// Options for [`check_entry_points`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Every literal entry point must resolve under each of these sets.
    pub condition_sets: Vec<Vec<String>>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            condition_sets: [["default"], ["types"], ["node"]]
                .iter()
                .map(|set| set.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }
}

/// Counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckCounts {
    pub error: usize,
    pub warn: usize,
    pub info: usize,
}

/// Result of checking one package.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Number of literal entry points checked.
    pub entry_points: usize,
    pub counts: CheckCounts,
    pub findings: Vec<CheckFinding>,
}

impl CheckReport {
    /// True when no error-level finding exists.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.counts.error == 0
    }
}

/// Check that every declared entry point of `exports` is reachable.
#[must_use]
pub fn check_entry_points(maps: &PackageSubpathMaps, options: &CheckOptions) -> CheckReport {
    let mappings = maps.mappings(SubpathField::Exports);
    let mut findings = Vec::new();

    findings.extend(multi_wildcard_findings(mappings));
    findings.extend(
        mappings
            .iter()
            .filter(|m| m.is_dead_condition && !is_unmatchable(&m.subpath))
            .map(|m| {
                CheckFinding::new(
                    codes::ENTRY_DEAD_CONDITION,
                    CheckSeverity::Warn,
                    &m.subpath,
                    format!(
                        "condition [{}] follows \"default\" and can never be selected",
                        m.conditions.join(", ")
                    ),
                )
                .with_conditions(&m.conditions)
                .with_target(m.target.as_deref())
            }),
    );
    findings.extend(
        mappings
            .iter()
            .filter(|m| {
                m.is_fallback
                    && m.target.is_some()
                    && !m.is_dead_condition
                    && !m.is_fallback_candidate(false)
                    && !is_unmatchable(&m.subpath)
            })
            .map(|m| {
                CheckFinding::new(
                    codes::ENTRY_UNSAFE_FALLBACK,
                    CheckSeverity::Info,
                    &m.subpath,
                    "fallback target is only reachable when unsafe fallbacks are included",
                )
                .with_conditions(&m.conditions)
                .with_target(m.target.as_deref())
            }),
    );

    let table = SubpathTable::new(mappings);
    let expected: Vec<&str> = table
        .entries()
        .iter()
        .filter(|e| !is_pattern(e.subpath) && e.records.iter().any(|r| r.target.is_some()))
        .map(|e| e.subpath)
        .collect();

    for subpath in &expected {
        for conditions in &options.condition_sets {
            let forward = ForwardOptions::new(conditions.iter().cloned());
            if resolve_targets_from_entry_point(mappings, subpath, &forward).is_empty() {
                findings.push(
                    CheckFinding::new(
                        codes::ENTRY_UNREACHABLE,
                        CheckSeverity::Error,
                        subpath,
                        format!(
                            "entry point does not resolve to a target under [{}]",
                            conditions.join(", ")
                        ),
                    )
                    .with_conditions(conditions),
                );
            }
        }
    }

    sort_findings(&mut findings);

    let mut counts = CheckCounts::default();
    for finding in &findings {
        match finding.severity {
            CheckSeverity::Error => counts.error += 1,
            CheckSeverity::Warn => counts.warn += 1,
            CheckSeverity::Info => counts.info += 1,
        }
    }

    CheckReport {
        schema_version: PKG_CHECK_SCHEMA_VERSION,
        package: maps.name.clone(),
        entry_points: expected.len(),
        counts,
        findings,
    }
}

fn multi_wildcard_findings(mappings: &[SubpathMapping]) -> Vec<CheckFinding> {
    let mut seen: Vec<&str> = Vec::new();
    for mapping in mappings.iter().filter(|m| is_unmatchable(&m.subpath)) {
        if !seen.contains(&mapping.subpath.as_str()) {
            seen.push(&mapping.subpath);
        }
    }
    seen.into_iter()
        .map(|subpath| {
            CheckFinding::new(
                codes::ENTRY_MULTI_WILDCARD,
                CheckSeverity::Warn,
                subpath,
                "subpath has more than one \"*\" and is ignored",
            )
        })
        .collect()
}

/// Stable sort: severity desc, then code, then subpath. Equal keys keep document order.
fn sort_findings(findings: &mut [CheckFinding]) {
    findings.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| a.code.cmp(b.code))
            .then_with(|| a.subpath.cmp(&b.subpath))
    });
}
