//! Error types for hook and implementation failures.
//!
//! A failure raised anywhere in an invocation — an override hook, the
//! default implementation, or a transform hook — propagates unchanged and
//! fails the enclosing future. The core retries nothing; retry policy, if
//! any, belongs to the wrapped implementation. Profiling never masks a
//! failure: an opened timing event is concluded before the error is
//! returned.

use thiserror::Error;

/// Result alias used throughout the pluggable call tree.
pub type PluggableResult<T> = Result<T, PluggableError>;

// ─────────────────────────────────────────────────────────────────────────────
// PluggableError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by pluggable invocation.
///
/// `Clone` and `PartialEq` are derived so callers (and tests) can assert
/// that a failure propagated without being rewritten along the way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluggableError {
    /// A failure raised by user code: an override hook, a transform hook,
    /// or a default implementation.
    #[error("{0}")]
    Failure(String),

    /// [`InvocationContext::call`](crate::InvocationContext::call) was given
    /// an alias the current node never declared as a dependency.
    #[error("no dependency bound as '{alias}' for pluggable '{name}'")]
    UnboundDependency {
        /// Name of the pluggable whose node was executing.
        name: &'static str,
        /// The alias that had no binding.
        alias: String,
    },
}

impl PluggableError {
    /// Creates a [`PluggableError::Failure`] from any message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        PluggableError::Failure(message.into())
    }
}
