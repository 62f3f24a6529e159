//! Control outcome — return type of block hook bodies.
//!
//! The non-local "abort" signal is modelled as a sum type rather than
//! an unwinding exception: a body that wants to abort returns
//! [`Control::Abort`]; everything else is
//! [`Control::Continue`] carrying the body's value. Whether an abort
//! (or a particular value) actually terminates the wrapped call is
//! decided by the [`Terminator`](crate::Terminator), not here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a block hook body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// The body ran to completion with this value.
    Continue(Value),

    /// The body raised the abort signal.
    Abort,
}

impl Control {
    /// Shorthand for `Continue(Value::Null)` — a side-effect-only body.
    #[must_use]
    pub fn done() -> Self {
        Self::Continue(Value::Null)
    }

    /// Returns `true` if this is a `Continue` variant.
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Returns `true` if this is an `Abort` variant.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort)
    }
}

impl From<Value> for Control {
    fn from(value: Value) -> Self {
        Self::Continue(value)
    }
}

/// Truthiness for guard results: everything except `null` and `false`
/// passes, including `0` and the empty string.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}
