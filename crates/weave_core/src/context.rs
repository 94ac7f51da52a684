//! Invocation context and the root-context builder.
//!
//! An [`InvocationContext`] carries three kinds of state through a call
//! tree, with three different sharing disciplines:
//!
//! - **Caller properties** flow *down*: every derived node clone starts from
//!   a shallow copy of its caller's properties, so descendants see what the
//!   root supplied, and mutations on a clone never touch the caller.
//! - **The hook registry** is shared *tree-wide* by [`Arc`] identity: every
//!   node consults the same frozen registry.
//! - **Dependency bindings** are *private per node*: each pluggable binds
//!   exactly its own declared dependencies into its clone, replacing
//!   whatever the caller had bound.
//!
//! # Building the root context
//!
//! ```
//! use weave_core::prelude::*;
//! use serde_json::json;
//!
//! let cx = InvocationContext::builder()
//!     .prop("entry", "src/index.js")
//!     .plugin(|o: &mut OverrideRegistrar<'_>, _t: &mut TransformRegistrar<'_>| {
//!         o.register_sync("resolve", |_cx, _args| Ok(HookAction::Defer));
//!     })
//!     .build();
//!
//! assert_eq!(cx.get("entry"), Some(&json!("src/index.js")));
//! assert_eq!(cx.registry().override_count("resolve"), 1);
//! ```
//!
//! # Known trap
//!
//! Plugins run only while the builder owns the registry; once `build`
//! returns, the registry is frozen inside an `Arc` and no further hooks can
//! be installed. Property keys and dependency aliases share no namespace
//! here (bindings are a separate typed map), but a caller property named
//! like a dependency alias is still two different lookups — `get` for the
//! property, [`dependency`](InvocationContext::dependency) for the binding.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{PluggableError, PluggableResult};
use crate::hooks::HookRegistry;
use crate::pluggable::Pluggable;
use crate::plugin::Plugin;
use crate::{BoxFuture, Value};
use weave_profiler::Profiler;

// ─────────────────────────────────────────────────────────────────────────────
// InvocationContext
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call-tree record of caller data, dependency bindings, and the shared
/// hook registry.
///
/// Cloning is shallow and cheap: properties are copied value-wise, the
/// registry and profiler handles are reference-counted.
#[derive(Clone)]
pub struct InvocationContext {
    /// Arbitrary caller-supplied properties, visible to every descendant.
    props: HashMap<String, Value>,
    /// Hook registry shared across the whole call tree.
    registry: Arc<HookRegistry>,
    /// This node's own dependency bindings, rebuilt at every node.
    bindings: HashMap<String, Pluggable>,
    /// Timing collaborator consulted by the pluggable wrapper.
    profiler: Arc<Profiler>,
    /// Name of the pluggable this clone is bound to; `None` at the root.
    current: Option<&'static str>,
}

impl InvocationContext {
    /// Starts building a root context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Returns the caller property stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Sets a caller property on *this* context.
    ///
    /// Only this clone observes the change; the caller's own context and
    /// any previously derived clones are unaffected.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    /// Iterates this context's property names.
    pub fn prop_names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// Returns the hook registry shared by this call tree.
    #[must_use]
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Returns the profiler collaborator for this call tree.
    #[must_use]
    pub fn profiler(&self) -> &Arc<Profiler> {
        &self.profiler
    }

    /// Returns the name of the pluggable this clone is bound to, or `None`
    /// for a root context.
    #[must_use]
    pub fn current_pluggable(&self) -> Option<&'static str> {
        self.current
    }

    /// Returns the dependency bound under `alias` at this node, if any.
    #[must_use]
    pub fn dependency(&self, alias: &str) -> Option<&Pluggable> {
        self.bindings.get(alias)
    }

    /// Iterates the dependency aliases bound at this node.
    pub fn dependency_aliases(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Invokes the dependency bound under `alias`, threading this context
    /// into the nested call.
    ///
    /// # Errors
    ///
    /// [`PluggableError::UnboundDependency`] if the current node never
    /// declared `alias`; otherwise whatever the nested invocation yields.
    pub fn call(&self, alias: &str, args: Vec<Value>) -> BoxFuture<PluggableResult<Value>> {
        match self.bindings.get(alias) {
            Some(dependency) => dependency.invoke(self, args),
            None => {
                let err = PluggableError::UnboundDependency {
                    name: self.current.unwrap_or("<root>"),
                    alias: alias.to_owned(),
                };
                Box::pin(futures::future::ready(Err(err)))
            }
        }
    }

    /// Derives the per-node clone for a pluggable invocation: shallow-copies
    /// properties, shares the registry and profiler, and binds exactly the
    /// node's own dependencies.
    pub(crate) fn derive(
        &self,
        name: &'static str,
        dependencies: &HashMap<String, Pluggable>,
    ) -> Self {
        Self {
            props: self.props.clone(),
            registry: Arc::clone(&self.registry),
            bindings: dependencies.clone(),
            profiler: Arc::clone(&self.profiler),
            current: Some(name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for root invocation contexts.
///
/// Collects initial properties and plugins; [`build`](Self::build) runs
/// every plugin exactly once, synchronously, in the order added, then
/// freezes the registry for execution.
#[derive(Default)]
pub struct ContextBuilder {
    props: HashMap<String, Value>,
    plugins: Vec<Box<dyn Plugin>>,
    profiler: Option<Arc<Profiler>>,
}

impl ContextBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a caller property to the root context.
    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Adds a plugin to run at build time.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Injects a profiler collaborator in place of the process-wide one.
    ///
    /// Tests use this for timing isolation between independent call trees.
    #[must_use]
    pub fn with_profiler(mut self, profiler: Arc<Profiler>) -> Self {
        self.profiler = Some(profiler);
        self
    }

    /// Runs every plugin against a fresh registry, freezes it, and returns
    /// the root context.
    #[must_use]
    pub fn build(self) -> InvocationContext {
        let mut registry = HookRegistry::default();
        for plugin in &self.plugins {
            tracing::trace!(plugin = plugin.name(), "installing plugin hooks");
            let (mut overrides, mut transforms) = registry.registrars();
            plugin.install(&mut overrides, &mut transforms);
        }

        InvocationContext {
            props: self.props,
            registry: Arc::new(registry),
            bindings: HashMap::new(),
            profiler: self.profiler.unwrap_or_else(Profiler::global),
            current: None,
        }
    }
}
