//! Hookable unit — owns named operations and their hook state.
//!
//! A [`Unit`] is the class-like entity hooks attach to. It keeps two
//! operation tables (instance-level and unit-level/static), each with a
//! registry of pristine implementations so hooks can be unwound, plus
//! the target allow-list and the public-only flag.
//!
//! # Concurrency
//!
//! Configuration (`define_*`, `restore_*`, `restrict_targets`) takes
//! `&mut self`; invocation takes `&self` and never mutates hook state.
//! Wrap in `Arc<std::sync::RwLock<Unit>>` if hooks must be configured
//! concurrently with calls; the intended pattern is a setup phase
//! before invocation begins.

use crate::chain::compose;
use crate::filter::AllowList;
use crate::hook::Hook;
use crate::pattern::NamePattern;
use crate::{HookError, HookKind};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The callable bound to an operation name: either the original
/// implementation or a composed hook chain wrapping it.
pub type OpFn =
    Arc<dyn Fn(&Receiver<'_>, &[Value]) -> Result<Value, HookError> + Send + Sync>;

/// Whether an operation may be invoked from outside the unit.
///
/// Hooking never changes visibility: a private operation stays private
/// through any number of rewraps and restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Callable externally via [`Unit::invoke`].
    Public,
    /// Callable only from receiver context ([`Receiver::call`]).
    Private,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Private`].
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// The current binding for one operation name.
#[derive(Clone)]
struct OpEntry {
    body: OpFn,
    visibility: Visibility,
}

/// One operation table: current bindings plus the registry of pristine
/// implementations.
#[derive(Clone, Default)]
struct OpTable {
    ops: HashMap<String, OpEntry>,
    originals: HashMap<String, OpFn>,
}

impl OpTable {
    /// Idempotent first-write: the registry keeps the implementation
    /// that existed before any hook was ever added for this name.
    fn record_original(&mut self, name: &str, body: OpFn) {
        self.originals.entry(name.to_string()).or_insert(body);
    }
}

/// Which table a receiver resolves against.
#[derive(Clone, Copy)]
enum Scope {
    Instance,
    Static,
}

/// The explicit receiver context passed to operation bodies, hook
/// bodies, and guards.
///
/// It stands in for the host-language implicit receiver: through it a
/// body can call the unit's other operations (including private ones)
/// by name, dispatching through their current hook chains.
pub struct Receiver<'a> {
    unit: &'a Unit,
    scope: Scope,
}

impl Receiver<'_> {
    /// Name of the unit this receiver belongs to.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        &self.unit.name
    }

    /// Calls a sibling operation by name, through its current chain.
    ///
    /// Private operations are reachable here (receiver context), unlike
    /// via [`Unit::invoke`].
    ///
    /// # Errors
    ///
    /// [`HookError::NoSuchOperation`] if the name does not resolve.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, HookError> {
        let entry = self
            .unit
            .table(self.scope)
            .ops
            .get(name)
            .ok_or_else(|| HookError::NoSuchOperation {
                unit: self.unit.name.clone(),
                name: name.to_string(),
            })?;
        (entry.body)(self, args)
    }
}

/// A class-like entity whose named operations can receive hooks.
pub struct Unit {
    name: String,
    methods: OpTable,
    statics: OpTable,
    allow_list: AllowList,
    public_only: bool,
}

impl Unit {
    /// Creates an empty unit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: OpTable::default(),
            statics: OpTable::default(),
            allow_list: AllowList::default(),
            public_only: false,
        }
    }

    /// The unit's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a derived unit: an independent copy of this unit's
    /// operations, originals registries, allow-list and public-only
    /// flag at this point in time.
    ///
    /// Hooks added to the derived unit never leak back to the parent
    /// (or to siblings), and vice versa.
    #[must_use]
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: self.methods.clone(),
            statics: self.statics.clone(),
            allow_list: self.allow_list.clone(),
            public_only: self.public_only,
        }
    }

    // ── Operation definition ─────────────────────────────────

    /// Defines (or redefines) a public instance operation.
    pub fn define_op(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Receiver<'_>, &[Value]) -> Result<Value, HookError> + Send + Sync + 'static,
    ) {
        self.methods.ops.insert(
            name.into(),
            OpEntry {
                body: Arc::new(f),
                visibility: Visibility::Public,
            },
        );
    }

    /// Defines a private instance operation, reachable only from
    /// receiver context.
    pub fn define_private_op(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Receiver<'_>, &[Value]) -> Result<Value, HookError> + Send + Sync + 'static,
    ) {
        self.methods.ops.insert(
            name.into(),
            OpEntry {
                body: Arc::new(f),
                visibility: Visibility::Private,
            },
        );
    }

    /// Defines a unit-level (static) operation.
    pub fn define_static_op(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Receiver<'_>, &[Value]) -> Result<Value, HookError> + Send + Sync + 'static,
    ) {
        self.statics.ops.insert(
            name.into(),
            OpEntry {
                body: Arc::new(f),
                visibility: Visibility::Public,
            },
        );
    }

    // ── Invocation ───────────────────────────────────────────

    /// Invokes an instance operation through its current chain.
    ///
    /// # Errors
    ///
    /// [`HookError::NoSuchOperation`] if the name does not resolve;
    /// [`HookError::PrivateOperation`] for private operations (external
    /// dispatch refuses them).
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, HookError> {
        self.dispatch(Scope::Instance, name, args)
    }

    /// Invokes a static operation through its current chain.
    ///
    /// # Errors
    ///
    /// As [`Unit::invoke`].
    pub fn invoke_static(&self, name: &str, args: &[Value]) -> Result<Value, HookError> {
        self.dispatch(Scope::Static, name, args)
    }

    fn dispatch(&self, scope: Scope, name: &str, args: &[Value]) -> Result<Value, HookError> {
        let entry = self
            .table(scope)
            .ops
            .get(name)
            .ok_or_else(|| HookError::NoSuchOperation {
                unit: self.name.clone(),
                name: name.to_string(),
            })?;
        if entry.visibility.is_private() {
            return Err(HookError::PrivateOperation {
                name: name.to_string(),
            });
        }
        let recv = Receiver { unit: self, scope };
        (entry.body)(&recv, args)
    }

    // ── Hook definition ──────────────────────────────────────

    /// Attaches a hook to an instance operation.
    ///
    /// The new hook wraps the operation's *current* implementation
    /// (which may already be a chain), becoming the outermost layer.
    /// The pristine implementation is recorded on the first hook for
    /// the name and never overwritten.
    ///
    /// # Errors
    ///
    /// [`HookError::TargetNotAllowed`] if a configured allow-list
    /// excludes the target (checked before anything else);
    /// [`HookError::NoSuchOperation`] if the target does not exist;
    /// [`HookError::PrivateTarget`] if the target is private while
    /// public-only is active; [`HookError::BodyKindMismatch`] if the
    /// body shape does not fit the kind. On error nothing is mutated.
    pub fn define_hook(
        &mut self,
        kind: HookKind,
        target: &str,
        hook: Hook,
    ) -> Result<(), HookError> {
        self.define_hook_in(Scope::Instance, kind, target, hook)
    }

    /// Attaches a hook to a static operation.
    ///
    /// # Errors
    ///
    /// As [`Unit::define_hook`].
    pub fn define_static_hook(
        &mut self,
        kind: HookKind,
        target: &str,
        hook: Hook,
    ) -> Result<(), HookError> {
        self.define_hook_in(Scope::Static, kind, target, hook)
    }

    fn define_hook_in(
        &mut self,
        scope: Scope,
        kind: HookKind,
        target: &str,
        hook: Hook,
    ) -> Result<(), HookError> {
        // Allow-list check comes before any other work.
        if !self.allow_list.allows(target) {
            return Err(HookError::TargetNotAllowed {
                name: target.to_string(),
            });
        }

        let public_only = self.public_only;
        let unit_name = self.name.clone();
        let table = self.table_mut(scope);
        let entry = table
            .ops
            .get(target)
            .ok_or_else(|| HookError::NoSuchOperation {
                unit: unit_name.clone(),
                name: target.to_string(),
            })?;
        if public_only && entry.visibility.is_private() {
            return Err(HookError::PrivateTarget {
                name: target.to_string(),
            });
        }

        let visibility = entry.visibility;
        let current = entry.body.clone();
        let composed = compose(kind, target, current.clone(), hook)?;

        table.record_original(target, current);
        table.ops.insert(
            target.to_string(),
            OpEntry {
                body: composed,
                visibility,
            },
        );
        tracing::debug!(unit = %unit_name, op = %target, kind = %kind, "hook installed");
        Ok(())
    }

    // ── Restore ──────────────────────────────────────────────

    /// Rebinds an instance operation to its pristine implementation.
    ///
    /// Restoring an operation that was never hooked is a no-op beyond
    /// re-deriving its current implementation.
    ///
    /// # Errors
    ///
    /// [`HookError::NoSuchOperation`] if the target was never defined
    /// at all.
    pub fn restore_original(&mut self, target: &str) -> Result<(), HookError> {
        self.restore_in(Scope::Instance, target)
    }

    /// Rebinds a static operation to its pristine implementation.
    ///
    /// # Errors
    ///
    /// As [`Unit::restore_original`].
    pub fn restore_static_original(&mut self, target: &str) -> Result<(), HookError> {
        self.restore_in(Scope::Static, target)
    }

    fn restore_in(&mut self, scope: Scope, target: &str) -> Result<(), HookError> {
        let unit_name = self.name.clone();
        let table = self.table_mut(scope);
        let pristine = match table.originals.get(target) {
            Some(body) => body.clone(),
            None => match table.ops.get(target) {
                Some(entry) => entry.body.clone(),
                None => {
                    return Err(HookError::NoSuchOperation {
                        unit: unit_name.clone(),
                        name: target.to_string(),
                    })
                }
            },
        };
        let Some(entry) = table.ops.get_mut(target) else {
            return Err(HookError::NoSuchOperation {
                unit: unit_name,
                name: target.to_string(),
            });
        };
        entry.body = pristine;
        tracing::debug!(op = %target, "original implementation restored");
        Ok(())
    }

    // ── Target filter & visibility policy ────────────────────

    /// Restricts which operation names may receive hooks.
    ///
    /// Candidates are the unit's current operation names (instance and
    /// static; private ones only while public-only is off). With only
    /// `include`, names matching it are eligible; with only `exclude`,
    /// names not matching it; with both, include filters first, then
    /// exclude removes. The computed set is fixed until the next call.
    ///
    /// # Errors
    ///
    /// [`HookError::MissingPattern`] when neither pattern is given;
    /// [`HookError::EmptyPattern`] for an empty pattern string.
    pub fn restrict_targets(
        &mut self,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<(), HookError> {
        if include.is_none() && exclude.is_none() {
            return Err(HookError::MissingPattern);
        }
        let include = include.map(NamePattern::parse).transpose()?;
        let exclude = exclude.map(NamePattern::parse).transpose()?;
        let list = AllowList::configure(
            self.candidate_names(),
            include.as_ref(),
            exclude.as_ref(),
        )?;
        self.allow_list = list;
        Ok(())
    }

    fn candidate_names(&self) -> Vec<&str> {
        self.methods
            .ops
            .iter()
            .chain(self.statics.ops.iter())
            .filter(|(_, entry)| !(self.public_only && entry.visibility.is_private()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Only public operations may be hooked from now on.
    pub fn public_only(&mut self) {
        self.public_only = true;
    }

    /// Private operations may be hooked again from now on.
    pub fn include_private(&mut self) {
        self.public_only = false;
    }

    /// Whether public-only mode is active.
    #[must_use]
    pub fn is_public_only(&self) -> bool {
        self.public_only
    }

    // ── Introspection ────────────────────────────────────────

    /// The visibility of an instance operation, if it exists.
    #[must_use]
    pub fn visibility_of(&self, name: &str) -> Option<Visibility> {
        self.methods.ops.get(name).map(|entry| entry.visibility)
    }

    /// Whether an instance operation currently has at least one hook
    /// recorded against it (i.e. a pristine original is stored).
    #[must_use]
    pub fn hooked(&self, name: &str) -> bool {
        self.methods.originals.contains_key(name)
    }

    fn table(&self, scope: Scope) -> &OpTable {
        match scope {
            Scope::Instance => &self.methods,
            Scope::Static => &self.statics,
        }
    }

    fn table_mut(&mut self, scope: Scope) -> &mut OpTable {
        match scope {
            Scope::Instance => &mut self.methods,
            Scope::Static => &mut self.statics,
        }
    }
}
