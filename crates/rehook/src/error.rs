//! Error types for the interception engine.

use crate::HookKind;
use thiserror::Error;

/// Errors that can occur while configuring or invoking hooks.
///
/// Everything here is raised synchronously and surfaced to the caller;
/// nothing is retried or recovered internally. Termination of a call by
/// a `before` hook is *not* an error — it is a normal early return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The named operation does not exist on the unit.
    ///
    /// Raised at definition time by `define_hook`/`restore_original`,
    /// and at invocation time when a late-bound hook method or a
    /// [`Receiver::call`](crate::Receiver::call) target is missing.
    #[error("no such operation `{name}` on unit `{unit}`")]
    NoSuchOperation {
        /// Name of the unit that was asked to resolve the operation.
        unit: String,
        /// The operation name that failed to resolve.
        name: String,
    },

    /// The target operation is outside the configured allow-list.
    #[error("operation `{name}` is not in the hook allow-list")]
    TargetNotAllowed {
        /// The rejected target name.
        name: String,
    },

    /// Attempted to hook a private operation while public-only is active.
    #[error("cannot hook private operation `{name}` while public-only is active")]
    PrivateTarget {
        /// The private target name.
        name: String,
    },

    /// Attempted to invoke a private operation from outside the unit.
    #[error("operation `{name}` is private")]
    PrivateOperation {
        /// The private operation name.
        name: String,
    },

    /// The hook body's shape does not fit the hook kind
    /// (e.g. a plain block given to an `around` hook, or vice versa).
    #[error("hook body does not fit `{kind}` hook on `{target}`")]
    BodyKindMismatch {
        /// The requested hook kind.
        kind: HookKind,
        /// The target operation name.
        target: String,
    },

    /// Unrecognized hook kind name.
    #[error("unknown hook kind: {0}")]
    UnknownKind(String),

    /// Unrecognized terminator name.
    #[error("unknown terminator: {0}")]
    UnknownTerminator(String),

    /// `restrict_targets` was called with neither an include nor an
    /// exclude pattern.
    #[error("target filter requires an include or exclude pattern")]
    MissingPattern,

    /// A name pattern was empty.
    #[error("empty name pattern")]
    EmptyPattern,

    /// An abort was signalled where no abort-signal boundary exists
    /// (a `return_false` before hook, or an after hook).
    #[error("abort signalled outside an abort-signal boundary in hook on `{target}`")]
    UnhandledAbort {
        /// The target operation whose hook raised the abort.
        target: String,
    },
}
