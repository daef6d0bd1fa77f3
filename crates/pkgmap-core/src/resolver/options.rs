//! Query options for forward and reverse resolution.

/// Options for resolving an entry point to its targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardOptions {
    /// Conditions the consumer satisfies. `default` always matches.
    pub conditions: Vec<String>,
    /// Return every non-null fallback element, not only the first.
    pub include_unsafe_fallback_targets: bool,
}

impl ForwardOptions {
    #[must_use]
    pub fn new<I, S>(conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            conditions: conditions.into_iter().map(Into::into).collect(),
            include_unsafe_fallback_targets: false,
        }
    }

    #[must_use]
    pub fn with_unsafe_fallback_targets(mut self, include: bool) -> Self {
        self.include_unsafe_fallback_targets = include;
        self
    }
}

/// Options for resolving a target back to the entry points that reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseOptions {
    /// Conditions the consumer satisfies. `default` always matches.
    pub conditions: Vec<String>,
    /// Consider every non-null fallback element, not only the first.
    pub include_unsafe_fallback_targets: bool,
    /// Replace `*` in pattern subpaths with the captured text.
    pub replace_subpath_asterisks: bool,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            include_unsafe_fallback_targets: false,
            replace_subpath_asterisks: true,
        }
    }
}

impl ReverseOptions {
    #[must_use]
    pub fn new<I, S>(conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            conditions: conditions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unsafe_fallback_targets(mut self, include: bool) -> Self {
        self.include_unsafe_fallback_targets = include;
        self
    }

    #[must_use]
    pub fn with_replace_subpath_asterisks(mut self, replace: bool) -> Self {
        self.replace_subpath_asterisks = replace;
        self
    }

    /// Forward options with the same conditions and fallback mode.
    #[must_use]
    pub fn forward(&self) -> ForwardOptions {
        ForwardOptions {
            conditions: self.conditions.clone(),
            include_unsafe_fallback_targets: self.include_unsafe_fallback_targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_defaults() {
        let options = ReverseOptions::default();
        assert!(options.conditions.is_empty());
        assert!(!options.include_unsafe_fallback_targets);
        assert!(options.replace_subpath_asterisks);
    }

    #[test]
    fn test_reverse_forward_conversion() {
        let options = ReverseOptions::new(["import", "node"])
            .with_unsafe_fallback_targets(true)
            .with_replace_subpath_asterisks(false);
        let forward = options.forward();
        assert_eq!(forward.conditions, vec!["import", "node"]);
        assert!(forward.include_unsafe_fallback_targets);
    }

    #[test]
    fn test_forward_builder() {
        let options = ForwardOptions::new(vec!["types".to_string()]);
        assert_eq!(options.conditions, vec!["types"]);
        assert!(!options.include_unsafe_fallback_targets);
        assert!(options.with_unsafe_fallback_targets(true).include_unsafe_fallback_targets);
    }
}
