//! The pluggable wrapper: hook dispatch around an implementation.
//!
//! A [`Pluggable`] wraps an async implementation function into an invocable
//! unit. Invoking it derives a per-node context clone, dispatches any
//! override hooks registered under the pluggable's name, falls back to the
//! default implementation, applies transform hooks left to right, and — when
//! the context's profiler is enabled — times the whole invocation.
//!
//! # Dispatch order
//!
//! 1. Override hooks, in registration order. A failing hook fails the whole
//!    invocation; a deferring hook yields to the next; a resolving hook
//!    short-circuits the rest *and* the default implementation.
//! 2. The default implementation, only if no override resolved.
//! 3. Transform hooks, in registration order, each receiving the current
//!    result and the original arguments.
//!
//! The timing event opened in step 0 is concluded once the final result
//! settles, on success and failure alike.
//!
//! # Example
//!
//! ```
//! use weave_core::prelude::*;
//! use serde_json::json;
//!
//! let resolve = Pluggable::new("resolve", |_cx, args| async move {
//!     Ok(json!({ "module": args[0].clone() }))
//! });
//! let compile = Pluggable::with_dependencies(
//!     "compile",
//!     |cx, args| async move { cx.call("resolve", args).await },
//!     [("resolve", resolve)],
//! );
//!
//! let cx = InvocationContext::builder().build();
//! let out = futures::executor::block_on(compile.invoke(&cx, vec![json!("./a")]))?;
//! assert_eq!(out, json!({ "module": "./a" }));
//! # Ok::<(), PluggableError>(())
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::Serialize;

use crate::action::HookAction;
use crate::context::InvocationContext;
use crate::error::PluggableResult;
use crate::{BoxFuture, Value};

/// Type-erased implementation function, as stored inside a [`Pluggable`].
pub type Implementation =
    Arc<dyn Fn(InvocationContext, Vec<Value>) -> BoxFuture<PluggableResult<Value>> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Pluggable
// ─────────────────────────────────────────────────────────────────────────────

/// A named, wrapped implementation interceptable by hooks.
///
/// Immutable once created: the name, implementation, and dependency map are
/// fixed at construction. Cloning shares the same inner unit.
///
/// The name is the key under which hooks and timing records attach; it must
/// be supplied explicitly — it is never inferred.
#[derive(Clone)]
pub struct Pluggable {
    inner: Arc<Inner>,
}

struct Inner {
    name: &'static str,
    implementation: Implementation,
    dependencies: HashMap<String, Pluggable>,
}

impl Pluggable {
    /// Wraps an implementation with no dependencies.
    #[must_use]
    pub fn new<F, Fut>(name: &'static str, implementation: F) -> Self
    where
        F: Fn(InvocationContext, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluggableResult<Value>> + Send + 'static,
    {
        Self::with_dependencies(name, implementation, core::iter::empty::<(String, Pluggable)>())
    }

    /// Wraps an implementation together with its dependency map.
    ///
    /// Each `(alias, pluggable)` pair is bound into the node's context clone
    /// on every invocation, so the implementation can reach its dependencies
    /// via [`InvocationContext::call`].
    #[must_use]
    pub fn with_dependencies<F, Fut, D, A>(
        name: &'static str,
        implementation: F,
        dependencies: D,
    ) -> Self
    where
        F: Fn(InvocationContext, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluggableResult<Value>> + Send + 'static,
        D: IntoIterator<Item = (A, Pluggable)>,
        A: Into<String>,
    {
        let dependencies = dependencies
            .into_iter()
            .map(|(alias, dep)| (alias.into(), dep))
            .collect();

        Self {
            inner: Arc::new(Inner {
                name,
                implementation: Arc::new(move |cx, args| Box::pin(implementation(cx, args))),
                dependencies,
            }),
        }
    }

    /// Returns the stable name hooks and timing records attach to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Returns the wrapped implementation itself.
    ///
    /// Tests use this to exercise the raw function without the hook and
    /// profiling machinery around it.
    #[must_use]
    pub fn implementation(&self) -> &Implementation {
        &self.inner.implementation
    }

    /// Returns the dependency wrapped under `alias`, if declared.
    #[must_use]
    pub fn dependency(&self, alias: &str) -> Option<&Pluggable> {
        self.inner.dependencies.get(alias)
    }

    /// Iterates the declared `(alias, dependency)` pairs.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &Pluggable)> {
        self.inner
            .dependencies
            .iter()
            .map(|(alias, dep)| (alias.as_str(), dep))
    }

    /// Returns a serializable introspection snapshot.
    ///
    /// External tooling (reference-doc generators and the like) reads this
    /// instead of coupling to live invocation.
    #[must_use]
    pub fn metadata(&self) -> PluggableMetadata {
        PluggableMetadata {
            name: self.inner.name,
            dependencies: self
                .dependencies()
                .map(|(alias, dep)| (alias.to_owned(), dep.name()))
                .collect(),
        }
    }

    /// Invokes this pluggable with the given context and arguments.
    ///
    /// The caller's context is never mutated; a per-node clone is derived
    /// and threaded into hooks, the implementation, and nested dependency
    /// calls.
    ///
    /// # Errors
    ///
    /// Whatever failure an override hook, the default implementation, or a
    /// transform hook raises, propagated unchanged.
    pub fn invoke(
        &self,
        context: &InvocationContext,
        args: Vec<Value>,
    ) -> BoxFuture<PluggableResult<Value>> {
        let inner = Arc::clone(&self.inner);
        let scoped = context.derive(inner.name, &inner.dependencies);

        Box::pin(async move {
            tracing::trace!(pluggable = inner.name, "invoking");

            let profiler = Arc::clone(scoped.profiler());
            let event = profiler
                .is_enabled()
                .then(|| profiler.start_event(inner.name));

            let result = dispatch(&inner, &scoped, args).await;

            // Conclude on success and failure alike; timing is never lost.
            if let Some(event) = event {
                event.conclude();
            }

            if let Err(err) = &result {
                tracing::debug!(pluggable = inner.name, error = %err, "invocation failed");
            }
            result
        })
    }
}

impl core::fmt::Debug for Pluggable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pluggable")
            .field("name", &self.inner.name)
            .field(
                "dependencies",
                &self.inner.dependencies.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Runs overrides, the default, and transforms for one invocation node.
async fn dispatch(
    inner: &Inner,
    scoped: &InvocationContext,
    args: Vec<Value>,
) -> PluggableResult<Value> {
    let registry = Arc::clone(scoped.registry());

    let mut resolved = None;
    for hook in registry.overrides_for(inner.name) {
        match hook(scoped.clone(), args.clone()).await? {
            HookAction::Defer => {}
            HookAction::Resolve(value) => {
                tracing::trace!(pluggable = inner.name, "override short-circuited");
                resolved = Some(value);
                break;
            }
        }
    }

    let mut result = match resolved {
        Some(value) => value,
        None => (inner.implementation)(scoped.clone(), args.clone()).await?,
    };

    for transform in registry.transforms_for(inner.name) {
        result = transform(scoped.clone(), result, args.clone()).await?;
    }

    Ok(result)
}

// ─────────────────────────────────────────────────────────────────────────────
// PluggableMetadata
// ─────────────────────────────────────────────────────────────────────────────

/// Introspection snapshot of a pluggable's name and dependency map.
///
/// Aliases are sorted so serialized output is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluggableMetadata {
    /// The pluggable's stable name.
    pub name: &'static str,
    /// Alias → dependency-name pairs declared at construction.
    pub dependencies: BTreeMap<String, &'static str>,
}
