use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::DEFAULT_CONDITION;

/// Runtime configuration for the pkgmap CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Conditions used when a query does not name any.
    pub conditions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            conditions: vec![DEFAULT_CONDITION.to_string()],
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set the default conditions. An empty list keeps the current defaults.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<String>) -> Self {
        if !conditions.is_empty() {
            self.conditions = conditions;
        }
        self
    }

    /// Pick the conditions for a query: explicit ones win over the defaults.
    #[must_use]
    pub fn conditions_or_default(&self, explicit: &[String]) -> Vec<String> {
        if explicit.is_empty() {
            self.conditions.clone()
        } else {
            explicit.to_vec()
        }
    }

    /// Path of the manifest to load: `explicit` (relative to `cwd`) or `cwd/package.json`.
    #[must_use]
    pub fn manifest_path(&self, explicit: Option<&std::path::Path>) -> PathBuf {
        match explicit {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.cwd.join(p),
            None => self.cwd.join("package.json"),
        }
    }
}
