//! Termination policy — whether a `before` hook stops the wrapped call.

use crate::{Control, HookError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a `before` hook signals that the wrapped operation (and every
/// hook defined earlier than it) must not run.
///
/// Only meaningful for `before` hooks; the default is [`AbortSignal`].
///
/// [`AbortSignal`]: Terminator::AbortSignal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminator {
    /// Termination iff the body produced [`Control::Abort`], no matter
    /// what any completed value would have been. The terminated call
    /// returns `null`.
    #[default]
    AbortSignal,

    /// Termination iff the body's value is exactly the boolean `false`
    /// (not null, not absent, not falsy-in-general). The terminated
    /// call returns `false`. An abort raised under this policy has no
    /// boundary to catch it and surfaces as
    /// [`HookError::UnhandledAbort`](crate::HookError::UnhandledAbort).
    ReturnFalse,
}

impl Terminator {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbortSignal => "abort_signal",
            Self::ReturnFalse => "return_false",
        }
    }

    /// Returns `true` if this policy installs an abort boundary around
    /// the hook body.
    #[must_use]
    pub fn catches_abort(self) -> bool {
        matches!(self, Self::AbortSignal)
    }

    /// Decides whether the body outcome terminates the wrapped call.
    #[must_use]
    pub fn is_termination(self, flow: &Control) -> bool {
        match self {
            Self::AbortSignal => flow.is_abort(),
            Self::ReturnFalse => matches!(flow, Control::Continue(Value::Bool(false))),
        }
    }

    /// The value the terminated call returns to its caller.
    #[must_use]
    pub fn short_circuit_value(self) -> Value {
        match self {
            Self::AbortSignal => Value::Null,
            Self::ReturnFalse => Value::Bool(false),
        }
    }
}

impl FromStr for Terminator {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort_signal" => Ok(Self::AbortSignal),
            "return_false" => Ok(Self::ReturnFalse),
            _ => Err(HookError::UnknownTerminator(s.to_string())),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
