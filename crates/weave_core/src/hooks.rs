//! Hook types, the per-tree registry, and registration handles.
//!
//! The [`HookRegistry`] maps pluggable names to ordered lists of override
//! and transform hooks. One registry is shared (by [`Arc`] identity) across
//! every node of a call tree, so registering a hook for a name affects every
//! invocation of that name anywhere in the tree.
//!
//! # Design Principles
//!
//! - Hooks execute in registration order, never concurrently within a node
//! - The registry is populated while the [`ContextBuilder`](crate::ContextBuilder)
//!   holds it mutably, then frozen before execution — no locking is needed
//! - Lookup for a name with no hooks yields an empty slice, never an error
//!
//! # Registration
//!
//! Plugins receive an [`OverrideRegistrar`] and a [`TransformRegistrar`].
//! Each offers `register` for future-returning hooks and `register_sync`
//! for plain closures, which are wrapped into ready futures internally.
//!
//! ```
//! use weave_core::prelude::*;
//!
//! # let mut registry = HookRegistry::default();
//! # let (mut overrides, mut transforms) = registry.registrars();
//! overrides.register_sync("resolve", |_cx, _args| Ok(HookAction::Defer));
//! transforms.register_sync("resolve", |_cx, result, _args| Ok(result));
//! # assert_eq!(registry.override_count("resolve"), 1);
//! # assert_eq!(registry.transform_count("resolve"), 1);
//! ```

use std::sync::Arc;

use futures::future;
use hashbrown::HashMap;

use crate::action::HookAction;
use crate::context::InvocationContext;
use crate::error::PluggableResult;
use crate::{BoxFuture, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Hook types
// ─────────────────────────────────────────────────────────────────────────────

/// Pre-execution interception hook.
///
/// Receives the node's cloned context and the original arguments; answers
/// with a [`HookAction`] — defer, or a replacement result.
pub type OverrideHook = Arc<
    dyn Fn(InvocationContext, Vec<Value>) -> BoxFuture<PluggableResult<HookAction>> + Send + Sync,
>;

/// Post-execution refinement hook.
///
/// Receives the node's cloned context, the current result, and the original
/// arguments; answers with the refined result.
pub type TransformHook = Arc<
    dyn Fn(InvocationContext, Value, Vec<Value>) -> BoxFuture<PluggableResult<Value>> + Send + Sync,
>;

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Name-keyed override and transform hooks for one call tree.
///
/// Per-name lists preserve registration order, which is also dispatch order.
#[derive(Default)]
pub struct HookRegistry {
    overrides: HashMap<String, Vec<OverrideHook>>,
    transforms: HashMap<String, Vec<TransformHook>>,
}

impl HookRegistry {
    /// Returns the override hooks registered for `name`, oldest first.
    #[must_use]
    pub fn overrides_for(&self, name: &str) -> &[OverrideHook] {
        self.overrides.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the transform hooks registered for `name`, oldest first.
    #[must_use]
    pub fn transforms_for(&self, name: &str) -> &[TransformHook] {
        self.transforms.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of override hooks registered for `name`.
    #[must_use]
    pub fn override_count(&self, name: &str) -> usize {
        self.overrides.get(name).map_or(0, Vec::len)
    }

    /// Returns the number of transform hooks registered for `name`.
    #[must_use]
    pub fn transform_count(&self, name: &str) -> usize {
        self.transforms.get(name).map_or(0, Vec::len)
    }

    /// Splits this registry into its two registration handles.
    ///
    /// Used by the context builder while running plugins; both handles
    /// borrow the registry mutably for their lifetime.
    pub fn registrars(&mut self) -> (OverrideRegistrar<'_>, TransformRegistrar<'_>) {
        (
            OverrideRegistrar {
                hooks: &mut self.overrides,
            },
            TransformRegistrar {
                hooks: &mut self.transforms,
            },
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OverrideRegistrar
// ─────────────────────────────────────────────────────────────────────────────

/// Append-only registration handle for override hooks.
pub struct OverrideRegistrar<'a> {
    hooks: &'a mut HashMap<String, Vec<OverrideHook>>,
}

impl OverrideRegistrar<'_> {
    /// Registers a future-returning override hook for `name`.
    ///
    /// Hooks for one name run in registration order.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(InvocationContext, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluggableResult<HookAction>> + Send + 'static,
    {
        let hook: OverrideHook = Arc::new(move |cx, args| Box::pin(hook(cx, args)));
        self.hooks.entry(name.into()).or_default().push(hook);
    }

    /// Registers a synchronous override hook for `name`.
    pub fn register_sync<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&InvocationContext, &[Value]) -> PluggableResult<HookAction> + Send + Sync + 'static,
    {
        self.register(name, move |cx, args| future::ready(hook(&cx, &args)));
    }

    /// The defer marker, exposed so plugin bodies can fall through to the
    /// next hook or the default implementation.
    #[must_use]
    pub fn defer(&self) -> HookAction {
        HookAction::Defer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TransformRegistrar
// ─────────────────────────────────────────────────────────────────────────────

/// Append-only registration handle for transform hooks.
pub struct TransformRegistrar<'a> {
    hooks: &'a mut HashMap<String, Vec<TransformHook>>,
}

impl TransformRegistrar<'_> {
    /// Registers a future-returning transform hook for `name`.
    ///
    /// Transform chains apply left to right, in registration order.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(InvocationContext, Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluggableResult<Value>> + Send + 'static,
    {
        let hook: TransformHook =
            Arc::new(move |cx, result, args| Box::pin(hook(cx, result, args)));
        self.hooks.entry(name.into()).or_default().push(hook);
    }

    /// Registers a synchronous transform hook for `name`.
    pub fn register_sync<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&InvocationContext, Value, &[Value]) -> PluggableResult<Value>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, move |cx, result, args| {
            future::ready(hook(&cx, result, &args))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_for_unknown_name_is_empty() {
        let registry = HookRegistry::default();
        assert!(registry.overrides_for("missing").is_empty());
        assert!(registry.transforms_for("missing").is_empty());
        assert_eq!(registry.override_count("missing"), 0);
        assert_eq!(registry.transform_count("missing"), 0);
    }

    #[test]
    fn register_appends_per_name_in_order() {
        let mut registry = HookRegistry::default();
        let (mut overrides, mut transforms) = registry.registrars();

        overrides.register_sync("resolve", |_cx, _args| Ok(HookAction::Defer));
        overrides.register_sync("resolve", |_cx, _args| Ok(HookAction::resolve(1)));
        transforms.register_sync("bundle", |_cx, result, _args| Ok(result));

        assert_eq!(registry.override_count("resolve"), 2);
        assert_eq!(registry.override_count("bundle"), 0);
        assert_eq!(registry.transform_count("bundle"), 1);
    }

    #[test]
    fn registrar_exposes_defer_marker() {
        let mut registry = HookRegistry::default();
        let (overrides, _transforms) = registry.registrars();
        assert!(overrides.defer().is_defer());
    }

    #[tokio::test]
    async fn registered_hooks_are_invocable() {
        let mut registry = HookRegistry::default();
        let (mut overrides, _transforms) = registry.registrars();
        overrides.register("resolve", |_cx, args| async move {
            Ok(HookAction::Resolve(args[0].clone()))
        });

        let cx = crate::InvocationContext::builder().build();
        let action = registry.overrides_for("resolve")[0](cx, vec![Value::from(7)])
            .await
            .expect("hook should succeed");
        assert_eq!(action, HookAction::resolve(7));
    }
}
