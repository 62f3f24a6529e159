//! Interception engine: before/after/around hooks on named operations.
//!
//! This crate lets a [`Unit`] — a class-like entity owning named
//! operations — have cross-cutting logic (auditing, validation, veto
//! checks, wrapping) attached to those operations after the fact, and
//! unwound again, without the operations knowing.
//!
//! # Core Concepts
//!
//! ## Units and operations
//!
//! A [`Unit`] holds instance-level and static operation tables. Each
//! operation is a callable from a [`Receiver`] context and a JSON
//! argument slice to a JSON value. Operations may be public or private;
//! external dispatch via [`Unit::invoke`] refuses private ones, while
//! [`Receiver::call`] (used by operation and hook bodies) may reach
//! them.
//!
//! ## Hooks
//!
//! [`Hook`] describes one interception: a body, a termination policy
//! ([`Terminator`]), and an optional guard. Three kinds exist
//! ([`HookKind`]):
//!
//! - `before` — runs ahead of the operation; may terminate the whole
//!   call early
//! - `after` — runs once the operation has succeeded; its own value is
//!   discarded
//! - `around` — wraps the operation, choosing if and when to run it via
//!   a continuation
//!
//! Each new hook wraps the operation's current implementation, so the
//! newest hook is always outermost: `before` hooks run newest-first,
//! `after` hooks run oldest-first, `around` hooks nest.
//!
//! ## Termination
//!
//! A `before` body returns [`Control`]: `Continue(value)` to let the
//! call proceed, or `Abort` to request termination. Under the default
//! [`Terminator::AbortSignal`] policy an abort terminates the call
//! (yielding `null`); under [`Terminator::ReturnFalse`] a body value of
//! exactly `false` terminates (yielding `false`) and an abort is an
//! error.
//!
//! ## Restore
//!
//! The first hook on an operation records its pristine implementation;
//! [`Unit::restore_original`] rebinds the name to it, shedding every
//! hook layer at once.
//!
//! ## Policy
//!
//! [`Unit::restrict_targets`] computes an allow-list from glob patterns
//! ([`NamePattern`]) over the current operation names, and
//! [`Unit::public_only`] forbids hooking private operations.
//!
//! ## Configuration
//!
//! [`HooksConfig`] and [`HookDef`] provide TOML-serializable
//! declarative hook definitions with validate/merge/apply.
//!
//! # Concurrency
//!
//! Hook configuration takes `&mut Unit`; invocation takes `&Unit`.
//! Wrap units in `Arc<std::sync::RwLock<_>>` when configuration and
//! invocation must interleave across threads.
//!
//! # Example
//!
//! ```
//! use rehook::{Control, Hook, HookKind, Unit};
//! use serde_json::{json, Value};
//!
//! let mut unit = Unit::new("store");
//! unit.define_op("save", |_recv, args| Ok(json!({ "saved": args.len() })));
//!
//! // Veto saves with no payload.
//! unit.define_hook(
//!     HookKind::Before,
//!     "save",
//!     Hook::block(|_recv, args| {
//!         if args.is_empty() {
//!             Control::Abort
//!         } else {
//!             Control::done()
//!         }
//!     }),
//! )?;
//!
//! assert_eq!(unit.invoke("save", &[json!("draft")])?, json!({ "saved": 1 }));
//! assert_eq!(unit.invoke("save", &[])?, Value::Null); // terminated
//!
//! unit.restore_original("save")?;
//! assert_eq!(unit.invoke("save", &[])?, json!({ "saved": 0 }));
//! # Ok::<(), rehook::HookError>(())
//! ```

mod chain;
mod config;
mod control;
mod error;
mod filter;
mod hook;
mod kind;
mod pattern;
mod terminator;
mod unit;

// Re-export core types
pub use config::{ApplyError, HookDef, HookDefError, HooksConfig};
pub use control::{truthy, Control};
pub use error::HookError;
pub use filter::AllowList;
pub use hook::{AroundFn, BlockFn, Guard, GuardFn, Hook, HookBody, Proceed};
pub use kind::HookKind;
pub use pattern::{NamePattern, Segment};
pub use terminator::Terminator;
pub use unit::{OpFn, Receiver, Unit, Visibility};

/// Test utilities for the interception engine.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::sync::{Arc, Mutex};

    /// A shared execution-order recorder for tests.
    ///
    /// Clones share the same log, so a `Trace` can be captured by any
    /// number of operation and hook closures and inspected afterwards.
    #[derive(Clone, Default)]
    pub struct Trace {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl Trace {
        /// Creates an empty trace.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Appends an entry.
        pub fn push(&self, entry: impl Into<String>) {
            self.entries
                .lock()
                .expect("trace lock should not be poisoned")
                .push(entry.into());
        }

        /// Snapshot of the entries recorded so far.
        #[must_use]
        pub fn entries(&self) -> Vec<String> {
            self.entries
                .lock()
                .expect("trace lock should not be poisoned")
                .clone()
        }
    }

}
