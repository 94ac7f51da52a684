//! Override outcomes.
//!
//! An override hook answers with a [`HookAction`]: either defer to the next
//! hook (or, once the list is exhausted, to the default implementation), or
//! resolve the invocation with a replacement result.
//!
//! [`HookAction::Defer`] is the control sentinel of the hook protocol. It is
//! a dedicated enum variant rather than a reserved in-band value, so it can
//! never collide with legitimate data — and transform hooks, whose return
//! type is a plain [`Value`], cannot produce it at all.

use crate::Value;

// ─────────────────────────────────────────────────────────────────────────────
// HookAction
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of an override hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Defer to the next override hook, or to the default implementation
    /// when no override remains.
    Defer,
    /// Short-circuit the remaining overrides and the default implementation
    /// with this result.
    Resolve(Value),
}

impl HookAction {
    /// Convenience constructor for [`HookAction::Resolve`].
    #[must_use]
    pub fn resolve(value: impl Into<Value>) -> Self {
        HookAction::Resolve(value.into())
    }

    /// Returns true if this action defers to the next hook or the default.
    #[must_use]
    pub fn is_defer(&self) -> bool {
        matches!(self, HookAction::Defer)
    }
}
