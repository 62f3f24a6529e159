//! Hook kinds — where a hook's logic runs relative to the wrapped call.

use crate::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three interception kinds.
///
/// Each `define_hook` call wraps the *current* implementation of the
/// target, so among hooks on the same name the most recently defined
/// layer is outermost. What that means temporally depends on the kind:
///
/// - `Before`: bodies run in reverse definition order, then the original.
/// - `After`: the original runs first, then bodies in definition order
///   (the innermost layer's post-logic unwinds first). The wrapped
///   call's return value is the inner chain's result; the after body's
///   own value is ignored.
/// - `Around`: the newest hook wraps all earlier ones around the
///   original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    /// Runs before the wrapped call; may terminate it (see
    /// [`Terminator`](crate::Terminator)).
    Before,
    /// Runs after the wrapped call returns successfully.
    After,
    /// Wraps the call; receives a continuation it may invoke zero, one,
    /// or more times.
    Around,
}

impl HookKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Around => "around",
        }
    }
}

impl FromStr for HookKind {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "around" => Ok(Self::Around),
            _ => Err(HookError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: &[HookKind] = &[HookKind::Before, HookKind::After, HookKind::Around];

    #[test]
    fn from_str_roundtrip_all() {
        for &kind in ALL_KINDS {
            let s = kind.to_string();
            let parsed: HookKind = s.parse().unwrap_or_else(|e| {
                panic!("failed to parse '{s}': {e}");
            });
            assert_eq!(parsed, kind, "roundtrip failed for {s}");
        }
    }

    #[test]
    fn from_str_unknown() {
        let result = "inside_out".parse::<HookKind>();
        assert!(matches!(
            result.expect_err("unknown kind should fail to parse"),
            HookError::UnknownKind(_)
        ));
    }

    #[test]
    fn from_str_empty() {
        assert!("".parse::<HookKind>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        for &kind in ALL_KINDS {
            let json = serde_json::to_string(&kind).expect("HookKind should serialize");
            let restored: HookKind = serde_json::from_str(&json).expect("HookKind should deserialize");
            assert_eq!(restored, kind);
        }
    }
}
