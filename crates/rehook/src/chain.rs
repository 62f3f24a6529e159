//! Hook chain composer — wraps the current implementation of an
//! operation with one more hook layer.
//!
//! Each composition closes over the previous callable, so the chain for
//! a name is a strictly nested sequence of layers with the original
//! implementation innermost. Short-circuiting a `before` hook therefore
//! skips the whole inner chain, not just the original.

use crate::control::truthy;
use crate::hook::{BlockFn, Guard, Hook, HookBody};
use crate::unit::{OpFn, Receiver};
use crate::{Control, HookError, HookKind};
use serde_json::Value;
use std::sync::Arc;

/// A body usable by `before`/`after` hooks: a block, or a late-bound
/// operation name. `Around` bodies are rejected at composition time so
/// the hot path never has to consider them.
enum EffectBody {
    Block(BlockFn),
    Method(String),
}

impl EffectBody {
    fn from_body(kind: HookKind, target: &str, body: HookBody) -> Result<Self, HookError> {
        match body {
            HookBody::Block(f) => Ok(Self::Block(f)),
            HookBody::Method(name) => Ok(Self::Method(name)),
            HookBody::Around(_) => Err(HookError::BodyKindMismatch {
                kind,
                target: target.to_string(),
            }),
        }
    }

    fn run(&self, recv: &Receiver<'_>, args: &[Value]) -> Result<Control, HookError> {
        match self {
            Self::Block(f) => Ok(f(recv, args)),
            // Late-bound: resolved against the receiver on every call.
            Self::Method(name) => recv.call(name, args).map(Control::Continue),
        }
    }
}

fn guard_passes(guard: Option<&Guard>, recv: &Receiver<'_>) -> Result<bool, HookError> {
    match guard {
        None => Ok(true),
        Some(Guard::Block(f)) => Ok(f(recv)),
        Some(Guard::Method(name)) => Ok(truthy(&recv.call(name, &[])?)),
    }
}

/// Builds the new callable for `target`, wrapping `inner` (the current
/// chain) with `hook`'s logic.
///
/// Fails with [`HookError::BodyKindMismatch`] when the body shape does
/// not fit the kind; nothing is installed in that case.
pub(crate) fn compose(
    kind: HookKind,
    target: &str,
    inner: OpFn,
    hook: Hook,
) -> Result<OpFn, HookError> {
    let Hook {
        body,
        terminator,
        guard,
    } = hook;

    match kind {
        HookKind::Before => {
            let body = EffectBody::from_body(kind, target, body)?;
            let target = target.to_string();
            let composed: OpFn = Arc::new(move |recv: &Receiver<'_>, args: &[Value]| {
                if guard_passes(guard.as_ref(), recv)? {
                    let flow = body.run(recv, args)?;
                    if flow.is_abort() && !terminator.catches_abort() {
                        tracing::warn!(op = %target, policy = %terminator, "abort signalled with no boundary");
                        return Err(HookError::UnhandledAbort {
                            target: target.clone(),
                        });
                    }
                    if terminator.is_termination(&flow) {
                        tracing::debug!(op = %target, policy = %terminator, "before hook terminated the call");
                        return Ok(terminator.short_circuit_value());
                    }
                }
                inner(recv, args)
            });
            Ok(composed)
        }

        HookKind::After => {
            let body = EffectBody::from_body(kind, target, body)?;
            let target = target.to_string();
            let composed: OpFn = Arc::new(move |recv: &Receiver<'_>, args: &[Value]| {
                // Inner chain first; its failures propagate before the
                // body gets a chance to run.
                let result = inner(recv, args)?;
                if guard_passes(guard.as_ref(), recv)? {
                    let flow = body.run(recv, args)?;
                    if flow.is_abort() {
                        tracing::warn!(op = %target, "abort signalled from an after hook");
                        return Err(HookError::UnhandledAbort {
                            target: target.clone(),
                        });
                    }
                }
                // The after body's own value is discarded.
                Ok(result)
            });
            Ok(composed)
        }

        HookKind::Around => {
            let HookBody::Around(f) = body else {
                return Err(HookError::BodyKindMismatch {
                    kind,
                    target: target.to_string(),
                });
            };
            let composed: OpFn = Arc::new(move |recv: &Receiver<'_>, args: &[Value]| {
                let proceed = || inner(recv, args);
                if guard_passes(guard.as_ref(), recv)? {
                    f(recv, args, &proceed)
                } else {
                    // A falsy guard makes the wrapper transparent; only
                    // `before` may skip the wrapped call.
                    proceed()
                }
            });
            Ok(composed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unit;

    // Chain semantics (ordering, termination, guards) are exercised
    // end-to-end in `unit::tests`; these cover composition-time errors.

    #[test]
    fn around_body_rejected_for_before() {
        let mut unit = Unit::new("c");
        unit.define_op("a", |_, _| Ok(Value::Null));
        let err = unit
            .define_hook(HookKind::Before, "a", Hook::around(|_, _, proceed| proceed()))
            .expect_err("around body should not fit a before hook");
        assert_eq!(
            err,
            HookError::BodyKindMismatch {
                kind: HookKind::Before,
                target: "a".into()
            }
        );
    }

    #[test]
    fn around_body_rejected_for_after() {
        let mut unit = Unit::new("c");
        unit.define_op("a", |_, _| Ok(Value::Null));
        let err = unit
            .define_hook(HookKind::After, "a", Hook::around(|_, _, proceed| proceed()))
            .expect_err("around body should not fit an after hook");
        assert!(matches!(err, HookError::BodyKindMismatch { .. }));
    }

    #[test]
    fn block_body_rejected_for_around() {
        let mut unit = Unit::new("c");
        unit.define_op("a", |_, _| Ok(Value::Null));
        let err = unit
            .define_hook(HookKind::Around, "a", Hook::block(|_, _| Control::done()))
            .expect_err("block body should not fit an around hook");
        assert!(matches!(err, HookError::BodyKindMismatch { .. }));
    }

    #[test]
    fn method_body_rejected_for_around() {
        // The operation signature has no continuation slot, so a named
        // body could never invoke the inner chain.
        let mut unit = Unit::new("c");
        unit.define_op("a", |_, _| Ok(Value::Null));
        let err = unit
            .define_hook(HookKind::Around, "a", Hook::method("helper"))
            .expect_err("method body should not fit an around hook");
        assert!(matches!(err, HookError::BodyKindMismatch { .. }));
    }

    #[test]
    fn failed_composition_leaves_chain_untouched() {
        let mut unit = Unit::new("c");
        unit.define_op("a", |_, _| Ok(Value::Bool(true)));
        let _ = unit.define_hook(HookKind::Around, "a", Hook::method("helper"));
        // The original binding still runs, and no original was recorded.
        assert_eq!(
            unit.invoke("a", &[]).expect("operation should still run"),
            Value::Bool(true)
        );
        assert!(!unit.hooked("a"));
    }
}
