//! Pluggable function composition for the Weave pipeline (Layer 1).
//!
//! `weave_core` lets any function in a call tree be intercepted before
//! execution by registered *override* hooks, post-processed after execution
//! by registered *transform* hooks, and optionally timed by the
//! [`weave_profiler`] recorder — while guaranteeing that per-invocation
//! state never leaks between independent calls.
//!
//! # Core Concepts
//!
//! - [`Pluggable`] - A named, wrapped implementation interceptable by hooks
//! - [`HookAction`] - Override outcome: defer to the next hook, or resolve
//! - [`HookRegistry`] - Override/transform maps shared by one whole call tree
//! - [`Plugin`] - Installer invoked once at context-build time
//! - [`InvocationContext`] - Caller props, dependency bindings, and the
//!   shared registry threaded through every node of a call tree
//!
//! # Example
//!
//! ```
//! use weave_core::prelude::*;
//! use serde_json::json;
//!
//! let double = Pluggable::new("double", |_cx, args| async move {
//!     let n = args[0].as_i64().unwrap_or(0);
//!     Ok(Value::from(n * 2))
//! });
//!
//! let cx = InvocationContext::builder().build();
//! let result = futures::executor::block_on(double.invoke(&cx, vec![json!(21)]))?;
//! assert_eq!(result, json!(42));
//! # Ok::<(), PluggableError>(())
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Weave architecture:
//!
//! - **Layer 0** (`weave_profiler`): process-wide invocation timing
//! - **Layer 1** (`weave_core`): hook dispatch and context threading (this crate)
//! - **Layer 2** (the embedding pipeline): resolution, bundling, code
//!   generation — external collaborators built *from* pluggables
//!
//! # Lifecycle
//!
//! Registration and execution are temporally disjoint: plugins install hooks
//! while the [`ContextBuilder`] holds the registry mutably, and
//! [`ContextBuilder::build`] freezes it into an [`Arc`](std::sync::Arc)
//! before any invocation can observe it.

/// Override outcomes: the defer marker and result replacement.
pub mod action;

/// Invocation context and the root-context builder.
pub mod context;

/// Error types for hook and implementation failures.
pub mod error;

/// Hook types, the per-tree registry, and registration handles.
pub mod hooks;

/// Plugin trait for installing hooks at context-build time.
pub mod plugin;

/// The pluggable wrapper: hook dispatch around an implementation.
pub mod pluggable;

/// The uniform dynamic value passed through pluggable call trees.
pub type Value = serde_json::Value;

/// Boxed future used by type-erased implementations and hooks.
pub type BoxFuture<T> = futures::future::BoxFuture<'static, T>;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::action::HookAction;
    pub use crate::context::{ContextBuilder, InvocationContext};
    pub use crate::error::{PluggableError, PluggableResult};
    pub use crate::hooks::{HookRegistry, OverrideRegistrar, TransformRegistrar};
    pub use crate::plugin::Plugin;
    pub use crate::pluggable::{Implementation, Pluggable, PluggableMetadata};
    pub use crate::{BoxFuture, Value};
}

// Re-export key types at crate root for convenience
pub use action::HookAction;
pub use context::{ContextBuilder, InvocationContext};
pub use error::{PluggableError, PluggableResult};
pub use hooks::{HookRegistry, OverrideRegistrar, TransformRegistrar};
pub use plugin::Plugin;
pub use pluggable::{Implementation, Pluggable, PluggableMetadata};
