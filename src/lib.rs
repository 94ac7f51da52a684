//! A pluggable function-composition core for module-compilation pipelines.
//!

pub use weave_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weave_internal::prelude::*;
}
