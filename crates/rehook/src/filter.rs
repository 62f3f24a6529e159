//! Target filter — which operation names may receive hooks.

use crate::{HookError, NamePattern};
use std::collections::BTreeSet;

/// The stored form of the target filter.
///
/// The default policy allows every name. Once configured, only names in
/// the computed set are eligible; the set is fixed until the next
/// configuration, so operations defined afterwards are outside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowList {
    /// No filter configured; every name is eligible.
    #[default]
    Unrestricted,
    /// Only these names are eligible.
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Returns `true` if the given name may receive hooks.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Only(names) => names.contains(name),
        }
    }

    /// Computes an allow-list from candidate names and patterns.
    ///
    /// With only an include pattern, the set is the candidates matching
    /// it. With only an exclude pattern, the candidates NOT matching
    /// it. With both, include filters first, then exclude removes —
    /// this order is fixed.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::MissingPattern`] when neither pattern is
    /// given.
    pub fn configure<'a>(
        candidates: impl IntoIterator<Item = &'a str>,
        include: Option<&NamePattern>,
        exclude: Option<&NamePattern>,
    ) -> Result<Self, HookError> {
        if include.is_none() && exclude.is_none() {
            return Err(HookError::MissingPattern);
        }

        let mut names = BTreeSet::new();
        for candidate in candidates {
            if !include.is_none_or(|p| p.matches(candidate)) {
                continue;
            }
            if exclude.is_some_and(|p| p.matches(candidate)) {
                continue;
            }
            names.insert(candidate.to_string());
        }
        Ok(Self::Only(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &[&str] = &["save", "save_all", "load", "row_count"];

    fn pat(s: &str) -> NamePattern {
        NamePattern::parse(s).unwrap_or_else(|e| panic!("pattern '{s}' should parse: {e}"))
    }

    fn configure(include: Option<&str>, exclude: Option<&str>) -> AllowList {
        AllowList::configure(
            CANDIDATES.iter().copied(),
            include.map(pat).as_ref(),
            exclude.map(pat).as_ref(),
        )
        .expect("configure with at least one pattern should succeed")
    }

    #[test]
    fn default_allows_everything() {
        let list = AllowList::default();
        assert!(list.allows("save"));
        assert!(list.allows("anything_at_all"));
    }

    #[test]
    fn neither_pattern_is_error() {
        let result = AllowList::configure(CANDIDATES.iter().copied(), None, None);
        assert!(matches!(result, Err(HookError::MissingPattern)));
    }

    #[test]
    fn include_only() {
        let list = configure(Some("save*"), None);
        assert!(list.allows("save"));
        assert!(list.allows("save_all"));
        assert!(!list.allows("load"));
        assert!(!list.allows("row_count"));
    }

    #[test]
    fn exclude_only() {
        let list = configure(None, Some("save*"));
        assert!(!list.allows("save"));
        assert!(!list.allows("save_all"));
        assert!(list.allows("load"));
        assert!(list.allows("row_count"));
    }

    #[test]
    fn include_then_exclude() {
        // Include constrains first, exclude removes from the included set.
        let list = configure(Some("save*"), Some("*_all"));
        assert!(list.allows("save"));
        assert!(!list.allows("save_all"));
        assert!(!list.allows("load"));
    }

    #[test]
    fn configured_set_ignores_non_candidates() {
        // "*" includes every candidate, but names never in the
        // candidate set stay out.
        let list = configure(Some("*"), None);
        assert!(list.allows("save"));
        assert!(!list.allows("defined_later"));
    }

    #[test]
    fn only_set_is_ordered() {
        let AllowList::Only(names) = configure(Some("*"), None) else {
            panic!("configure should produce Only");
        };
        let collected: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(collected, ["load", "row_count", "save", "save_all"]);
    }
}
