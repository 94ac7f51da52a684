//! Plugin trait for installing hooks at context-build time.
//!
//! Plugins are the unit of extension in Weave: each one is handed the two
//! registration handles exactly once, synchronously, while the root context
//! is being built, and installs whatever override/transform hooks it needs.
//! By the time any pluggable is invoked, every plugin has already run.
//!
//! # Example
//!
//! ```
//! use weave_core::prelude::*;
//!
//! struct CachePlugin;
//!
//! impl Plugin for CachePlugin {
//!     fn install(&self, overrides: &mut OverrideRegistrar<'_>, _: &mut TransformRegistrar<'_>) {
//!         overrides.register_sync("resolve", |_cx, _args| {
//!             // Nothing cached yet; let the default implementation run.
//!             Ok(HookAction::Defer)
//!         });
//!     }
//! }
//!
//! let cx = InvocationContext::builder().plugin(CachePlugin).build();
//! assert_eq!(cx.registry().override_count("resolve"), 1);
//! ```
//!
//! Bare closures over the two registrars are plugins too:
//!
//! ```
//! use weave_core::prelude::*;
//!
//! let cx = InvocationContext::builder()
//!     .plugin(|o: &mut OverrideRegistrar<'_>, _t: &mut TransformRegistrar<'_>| {
//!         o.register_sync("bundle", |_cx, _args| Ok(HookAction::resolve("cached")));
//!     })
//!     .build();
//! assert_eq!(cx.registry().override_count("bundle"), 1);
//! ```

use crate::hooks::{OverrideRegistrar, TransformRegistrar};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// An installer of override and transform hooks.
///
/// [`install`](Self::install) is called exactly once per plugin, in the
/// order plugins were added to the [`ContextBuilder`](crate::ContextBuilder),
/// before the registry is frozen for execution.
pub trait Plugin: Send + Sync {
    /// Installs this plugin's hooks into the registry being built.
    fn install(
        &self,
        overrides: &mut OverrideRegistrar<'_>,
        transforms: &mut TransformRegistrar<'_>,
    );

    /// Returns the plugin's name for debugging and error messages.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

/// Closures over the two registrars act as plugins directly.
impl<F> Plugin for F
where
    F: Fn(&mut OverrideRegistrar<'_>, &mut TransformRegistrar<'_>) + Send + Sync,
{
    fn install(
        &self,
        overrides: &mut OverrideRegistrar<'_>,
        transforms: &mut TransformRegistrar<'_>,
    ) {
        self(overrides, transforms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::HookAction;
    use crate::hooks::HookRegistry;

    struct NamedPlugin;

    impl Plugin for NamedPlugin {
        fn install(
            &self,
            overrides: &mut OverrideRegistrar<'_>,
            _transforms: &mut TransformRegistrar<'_>,
        ) {
            overrides.register_sync("parse", |_cx, _args| Ok(HookAction::Defer));
        }
    }

    #[test]
    fn plugin_default_name_is_type_name() {
        assert!(NamedPlugin.name().contains("NamedPlugin"));
    }

    #[test]
    fn struct_plugin_installs_hooks() {
        let mut registry = HookRegistry::default();
        let (mut overrides, mut transforms) = registry.registrars();
        NamedPlugin.install(&mut overrides, &mut transforms);
        assert_eq!(registry.override_count("parse"), 1);
    }

    #[test]
    fn closure_acts_as_plugin() {
        let plugin = |o: &mut OverrideRegistrar<'_>, t: &mut TransformRegistrar<'_>| {
            o.register_sync("parse", |_cx, _args| Ok(HookAction::Defer));
            t.register_sync("parse", |_cx, result, _args| Ok(result));
        };

        let mut registry = HookRegistry::default();
        let (mut overrides, mut transforms) = registry.registrars();
        Plugin::install(&plugin, &mut overrides, &mut transforms);
        assert_eq!(registry.override_count("parse"), 1);
        assert_eq!(registry.transform_count("parse"), 1);
    }
}
