//! # Weave Internal Library
//!
//! Re-exports the core Weave crates for convenience.

/// Layer 0: process-wide invocation timing.
pub use weave_profiler;

/// Layer 1: pluggable function composition.
pub use weave_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weave_core::prelude::*;
    pub use weave_profiler::prelude::*;
}
