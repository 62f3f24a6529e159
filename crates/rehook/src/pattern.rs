//! Name patterns for operation-name matching.
//!
//! Patterns are flat globs over operation names: literal text with `*`
//! wildcard segments that match any (possibly empty) run of characters.
//!
//! ```text
//! "save"      → exactly "save"
//! "save_*"    → "save_draft", "save_all", ...
//! "*_count"   → "row_count", "byte_count", ...
//! "*"         → every name
//! ```

use crate::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single segment in a name pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Matches exactly the given text.
    Literal(String),
    /// Matches any run of characters, including the empty run.
    Wildcard,
}

/// A parsed glob-style pattern over operation names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePattern {
    segments: Vec<Segment>,
}

impl NamePattern {
    /// Parses a pattern string.
    ///
    /// Adjacent `*`s collapse into one wildcard.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::EmptyPattern`] for the empty string.
    pub fn parse(pattern: &str) -> Result<Self, HookError> {
        if pattern.is_empty() {
            return Err(HookError::EmptyPattern);
        }

        let mut segments = Vec::new();
        for (i, part) in pattern.split('*').enumerate() {
            if i > 0 && segments.last() != Some(&Segment::Wildcard) {
                segments.push(Segment::Wildcard);
            }
            if !part.is_empty() {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self { segments })
    }

    /// Returns `true` if this pattern matches the given name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match_segments(&self.segments, name)
    }
}

fn match_segments(segments: &[Segment], rest: &str) -> bool {
    let Some((head, tail)) = segments.split_first() else {
        return rest.is_empty();
    };
    match head {
        Segment::Literal(lit) => rest
            .strip_prefix(lit.as_str())
            .is_some_and(|r| match_segments(tail, r)),
        Segment::Wildcard => {
            if tail.is_empty() {
                return true;
            }
            let mut idx = 0;
            loop {
                if match_segments(tail, &rest[idx..]) {
                    return true;
                }
                match rest[idx..].chars().next() {
                    Some(c) => idx += c.len_utf8(),
                    None => return false,
                }
            }
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => f.write_str(lit)?,
                Segment::Wildcard => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(s: &str) -> NamePattern {
        NamePattern::parse(s).unwrap_or_else(|e| panic!("pattern '{s}' should parse: {e}"))
    }

    // ── Parsing ──────────────────────────────────────────────

    #[test]
    fn parse_literal() {
        let p = pat("save");
        assert_eq!(p.to_string(), "save");
    }

    #[test]
    fn parse_empty_is_error() {
        assert!(matches!(
            NamePattern::parse(""),
            Err(HookError::EmptyPattern)
        ));
    }

    #[test]
    fn parse_collapses_adjacent_wildcards() {
        assert_eq!(pat("a**b"), pat("a*b"));
    }

    // ── Matching ─────────────────────────────────────────────

    #[test]
    fn match_exact() {
        assert!(pat("save").matches("save"));
        assert!(!pat("save").matches("save_all"));
        assert!(!pat("save").matches("presave"));
    }

    #[test]
    fn match_prefix() {
        let p = pat("save_*");
        assert!(p.matches("save_draft"));
        assert!(p.matches("save_"));
        assert!(!p.matches("save"));
        assert!(!p.matches("load_draft"));
    }

    #[test]
    fn match_suffix() {
        let p = pat("*_count");
        assert!(p.matches("row_count"));
        assert!(!p.matches("counter"));
    }

    #[test]
    fn match_infix() {
        let p = pat("get_*_id");
        assert!(p.matches("get_user_id"));
        assert!(p.matches("get__id"));
        assert!(!p.matches("get_user_name"));
    }

    #[test]
    fn match_everything() {
        let p = pat("*");
        assert!(p.matches("anything"));
        assert!(p.matches(""));
    }

    #[test]
    fn match_multibyte() {
        assert!(pat("保存*").matches("保存する"));
        assert!(pat("*する").matches("保存する"));
    }

    // ── Display ──────────────────────────────────────────────

    #[test]
    fn display_roundtrip() {
        for &s in &["save", "save_*", "*_count", "get_*_id", "*"] {
            assert_eq!(pat(s).to_string(), s, "display roundtrip failed for {s}");
        }
    }

    // ── Serde ────────────────────────────────────────────────

    #[test]
    fn serde_roundtrip() {
        let p = pat("save_*");
        let json = serde_json::to_string(&p).expect("NamePattern should serialize");
        let restored: NamePattern =
            serde_json::from_str(&json).expect("NamePattern should deserialize");
        assert_eq!(p, restored);
    }
}
