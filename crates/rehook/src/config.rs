//! Declarative hook configuration.
//!
//! TOML-serializable hook definitions that can be validated up front
//! and applied to a [`Unit`] in one pass. Declarative bodies are always
//! late-bound operation names, so `around` hooks (which need a
//! continuation) cannot be declared here; attach those through
//! [`Unit::define_hook`] directly.
//!
//! # Example TOML
//!
//! ```toml
//! [[hooks]]
//! id = "audit-saves"
//! kind = "before"
//! target = "save"
//! method = "audit"
//!
//! [[hooks]]
//! id = "veto-purges"
//! kind = "before"
//! target = "purge"
//! method = "purge_allowed"
//! terminator = "return_false"
//! guard = "strict_mode"
//! ```

use crate::{Hook, HookError, HookKind, Terminator, Unit};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Top-level hooks configuration: a list of declarative definitions
/// applied in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HooksConfig {
    /// Declarative hook definitions.
    pub hooks: Vec<HookDef>,
}

/// A single declarative hook definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookDef {
    /// Identifier used in error labels and merge override semantics.
    pub id: Option<String>,

    /// Hook kind: "before" or "after" ("around" is not declarative).
    pub kind: String,

    /// The operation to hook.
    pub target: String,

    /// Name of the operation that serves as the hook body, resolved on
    /// the receiver at each invocation.
    pub method: String,

    /// Termination policy: "abort_signal" (default) or "return_false".
    #[serde(default = "default_terminator")]
    pub terminator: String,

    /// Optional guard: an operation name whose result gates the body
    /// (`null`/`false` skip it).
    pub guard: Option<String>,

    /// Scope: "instance" (default) or "static".
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Whether the definition is applied. Default: true. Disabled
    /// definitions still validate.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_terminator() -> String {
    Terminator::AbortSignal.as_str().to_string()
}

fn default_scope() -> String {
    "instance".to_string()
}

fn default_enabled() -> bool {
    true
}

/// Errors from validating a [`HookDef`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookDefError {
    /// The kind string is not a known hook kind.
    #[error("hook '{label}': {source}")]
    InvalidKind { label: String, source: HookError },

    /// The kind is `around`, which has no declarative body form.
    #[error("hook '{label}': around hooks cannot be declared in config (the body needs a continuation)")]
    AroundNotDeclarative { label: String },

    /// The terminator string is not a known policy.
    #[error("hook '{label}': {source}")]
    InvalidTerminator { label: String, source: HookError },

    /// The scope string is neither "instance" nor "static".
    #[error("hook '{label}': unknown scope '{scope}' (expected 'instance' or 'static')")]
    InvalidScope { label: String, scope: String },

    /// The target name is empty.
    #[error("hook '{label}': empty target")]
    EmptyTarget { label: String },

    /// The body method name is empty.
    #[error("hook '{label}': empty method")]
    EmptyMethod { label: String },
}

/// Errors from applying a config to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The definition failed validation.
    #[error(transparent)]
    Invalid(#[from] HookDefError),

    /// The unit rejected the hook (unknown target, allow-list,
    /// visibility policy).
    #[error("hook '{label}': {source}")]
    Rejected { label: String, source: HookError },
}

/// A validated, parsed view of one definition.
struct ParsedDef {
    kind: HookKind,
    terminator: Terminator,
    is_static: bool,
}

impl HookDef {
    fn label(&self) -> String {
        self.id.as_deref().unwrap_or("<anonymous>").to_string()
    }

    fn parse(&self) -> Result<ParsedDef, HookDefError> {
        let label = self.label();

        if self.target.is_empty() {
            return Err(HookDefError::EmptyTarget { label });
        }
        if self.method.is_empty() {
            return Err(HookDefError::EmptyMethod { label });
        }

        let kind = HookKind::from_str(&self.kind).map_err(|e| HookDefError::InvalidKind {
            label: label.clone(),
            source: e,
        })?;
        if kind == HookKind::Around {
            return Err(HookDefError::AroundNotDeclarative { label });
        }

        let terminator =
            Terminator::from_str(&self.terminator).map_err(|e| HookDefError::InvalidTerminator {
                label: label.clone(),
                source: e,
            })?;

        let is_static = match self.scope.as_str() {
            "instance" => false,
            "static" => true,
            other => {
                return Err(HookDefError::InvalidScope {
                    label,
                    scope: other.to_string(),
                })
            }
        };

        Ok(ParsedDef {
            kind,
            terminator,
            is_static,
        })
    }

    /// Validates this definition without touching any unit.
    ///
    /// Target existence is not checked here; that depends on the unit
    /// the config is eventually applied to.
    ///
    /// # Errors
    ///
    /// See [`HookDefError`].
    pub fn validate(&self) -> Result<(), HookDefError> {
        self.parse().map(|_| ())
    }

    /// Applies this definition to a unit.
    ///
    /// # Errors
    ///
    /// [`ApplyError::Invalid`] if the definition does not validate;
    /// [`ApplyError::Rejected`] if the unit refuses the hook.
    pub fn apply(&self, unit: &mut Unit) -> Result<(), ApplyError> {
        let parsed = self.parse()?;
        if !self.enabled {
            tracing::debug!(hook = %self.label(), "skipping disabled hook definition");
            return Ok(());
        }

        let mut hook = Hook::method(self.method.clone()).with_terminator(parsed.terminator);
        if let Some(guard) = &self.guard {
            hook = hook.with_guard_method(guard.clone());
        }

        let result = if parsed.is_static {
            unit.define_static_hook(parsed.kind, &self.target, hook)
        } else {
            unit.define_hook(parsed.kind, &self.target, hook)
        };
        result.map_err(|e| ApplyError::Rejected {
            label: self.label(),
            source: e,
        })
    }
}

impl HooksConfig {
    /// Merges another config into this one.
    ///
    /// Definitions accumulate across config layers. A definition in
    /// `other` whose `id` matches an existing one replaces it
    /// (override semantics); new or anonymous definitions are appended.
    pub fn merge(&mut self, other: &Self) {
        for hook in &other.hooks {
            if let Some(id) = &hook.id {
                self.hooks.retain(|h| h.id.as_deref() != Some(id));
            }
            self.hooks.push(hook.clone());
        }
    }

    /// Validates every definition, returning all errors rather than
    /// just the first.
    pub fn validate_all(&self) -> Vec<HookDefError> {
        self.hooks
            .iter()
            .filter_map(|h| h.validate().err())
            .collect()
    }

    /// Applies every definition to the unit, in order, stopping at the
    /// first failure.
    ///
    /// Definitions applied before the failure stay applied; validate
    /// with [`HooksConfig::validate_all`] first if that matters.
    ///
    /// # Errors
    ///
    /// The first [`ApplyError`] encountered.
    pub fn apply(&self, unit: &mut Unit) -> Result<(), ApplyError> {
        for def in &self.hooks {
            def.apply(unit)?;
        }
        tracing::debug!(unit = %unit.name(), hooks = self.hooks.len(), "hook config applied");
        Ok(())
    }
}
