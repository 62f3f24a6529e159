//! Hook descriptor — body, terminator and guard for one hook.

use crate::unit::Receiver;
use crate::{Control, HookError, Terminator};
use serde_json::Value;
use std::sync::Arc;

/// A block body for `before`/`after` hooks. Receives the receiver
/// context and the original call's arguments.
pub type BlockFn = Arc<dyn Fn(&Receiver<'_>, &[Value]) -> Control + Send + Sync>;

/// A wrapping body for `around` hooks. Receives the receiver context,
/// the original call's arguments, and the continuation standing for the
/// wrapped (inner) chain.
pub type AroundFn =
    Arc<dyn Fn(&Receiver<'_>, &[Value], &Proceed<'_>) -> Result<Value, HookError> + Send + Sync>;

/// A guard predicate, evaluated in the calling instance's context.
pub type GuardFn = Arc<dyn Fn(&Receiver<'_>) -> bool + Send + Sync>;

/// The continuation handed to an `around` body. Invokes the wrapped
/// chain with the original arguments; may be called zero, one, or more
/// times.
pub type Proceed<'a> = dyn Fn() -> Result<Value, HookError> + 'a;

/// The logic a hook runs.
pub enum HookBody {
    /// A closure, for `before` and `after` hooks.
    Block(BlockFn),
    /// A wrapping closure, for `around` hooks.
    Around(AroundFn),
    /// The name of an operation on the receiver, resolved at each
    /// invocation (late-bound, not at registration). The operation may
    /// be defined after the hook is — e.g. by a derived unit — as long
    /// as it exists by the time the hook fires.
    Method(String),
}

/// Whether a hook's own logic runs for a given call.
///
/// A falsy guard only suppresses the hook body; it never gates the
/// wrapped chain.
pub enum Guard {
    /// A predicate closure.
    Block(GuardFn),
    /// The name of an operation on the receiver, invoked with no
    /// arguments; any result other than `null`/`false` passes.
    Method(String),
}

/// A hook to attach to a named operation.
///
/// Built with one of the body constructors, then refined builder-style:
///
/// ```
/// use rehook::{Control, Hook, Terminator};
///
/// let hook = Hook::block(|_recv, _args| Control::done())
///     .with_terminator(Terminator::ReturnFalse)
///     .with_guard(|_recv| true);
/// ```
pub struct Hook {
    pub(crate) body: HookBody,
    pub(crate) terminator: Terminator,
    pub(crate) guard: Option<Guard>,
}

impl Hook {
    /// A hook with a block body, for `before`/`after`.
    pub fn block(
        f: impl Fn(&Receiver<'_>, &[Value]) -> Control + Send + Sync + 'static,
    ) -> Self {
        Self::with_body(HookBody::Block(Arc::new(f)))
    }

    /// A hook with a wrapping body, for `around`.
    pub fn around(
        f: impl Fn(&Receiver<'_>, &[Value], &Proceed<'_>) -> Result<Value, HookError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::with_body(HookBody::Around(Arc::new(f)))
    }

    /// A hook whose body is the named operation on the receiver,
    /// resolved at each invocation.
    ///
    /// A named body completes normally (it cannot raise the abort
    /// signal), so under the default `abort_signal` terminator it never
    /// terminates the call; pair it with
    /// [`Terminator::ReturnFalse`] to let it veto by returning `false`.
    pub fn method(name: impl Into<String>) -> Self {
        Self::with_body(HookBody::Method(name.into()))
    }

    fn with_body(body: HookBody) -> Self {
        Self {
            body,
            terminator: Terminator::default(),
            guard: None,
        }
    }

    /// Sets the termination policy (meaningful only for `before`).
    #[must_use]
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets a guard predicate.
    #[must_use]
    pub fn with_guard(mut self, guard: impl Fn(&Receiver<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Guard::Block(Arc::new(guard)));
        self
    }

    /// Sets a guard resolved by operation name on the receiver.
    #[must_use]
    pub fn with_guard_method(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(Guard::Method(name.into()));
        self
    }
}
