//! Process-wide scene state.
//!
//! The context is created by [`init_context`] and dropped by
//! [`shutdown_context`]. Nothing is created lazily; after a shutdown the
//! context can be initialized again.

use std::sync::{PoisonError, RwLock};

use glam::DVec3;

use crate::error::{CalibscopeError, Result};
use crate::options::Options;
use crate::registry::Registry;

static CONTEXT: RwLock<Option<Context>> = RwLock::new(None);

/// Registered structures, options and scene extents.
pub struct Context {
    pub registry: Registry,
    pub options: Options,
    /// Diagonal of [`Self::bounding_box`], 1 for an empty scene.
    pub length_scale: f64,
    /// World bounds of the enabled structures as `(min, max)`.
    pub bounding_box: (DVec3, DVec3),
}

impl Default for Context {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl Context {
    /// Empty context holding `options`.
    pub fn with_options(options: Options) -> Self {
        Self {
            registry: Registry::new(),
            options,
            length_scale: 1.0,
            bounding_box: (DVec3::ZERO, DVec3::ONE),
        }
    }

    /// Recomputes the scene bounds after structures were added or removed.
    ///
    /// Disabled structures and structures without extent are ignored.
    pub fn update_extents(&mut self) {
        let bounds = self
            .registry
            .iter()
            .filter(|s| s.is_enabled())
            .filter_map(|s| s.bounding_box())
            .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)));

        (self.bounding_box, self.length_scale) = match bounds {
            Some((min, max)) => ((min, max), (max - min).length()),
            None => ((DVec3::ZERO, DVec3::ONE), 1.0),
        };
    }
}

/// Creates the process context.
///
/// Fails with `AlreadyInitialized` while a context exists.
pub fn init_context(options: Options) -> Result<()> {
    let mut slot = CONTEXT.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(CalibscopeError::AlreadyInitialized);
    }
    *slot = Some(Context::with_options(options));
    Ok(())
}

pub fn is_initialized() -> bool {
    CONTEXT.read().is_ok_and(|slot| slot.is_some())
}

/// Runs `f` with shared access to the context.
///
/// # Panics
///
/// Panics if the context has not been initialized.
pub fn with_context<R>(f: impl FnOnce(&Context) -> R) -> R {
    try_with_context(f).expect("calibscope context not initialized")
}

/// Runs `f` with exclusive access to the context.
///
/// # Panics
///
/// Panics if the context has not been initialized.
pub fn with_context_mut<R>(f: impl FnOnce(&mut Context) -> R) -> R {
    try_with_context_mut(f).expect("calibscope context not initialized")
}

/// Like [`with_context`], but returns `None` without a context.
pub fn try_with_context<R>(f: impl FnOnce(&Context) -> R) -> Option<R> {
    CONTEXT.read().ok()?.as_ref().map(f)
}

/// Like [`with_context_mut`], but returns `None` without a context.
pub fn try_with_context_mut<R>(f: impl FnOnce(&mut Context) -> R) -> Option<R> {
    CONTEXT.write().ok()?.as_mut().map(f)
}

/// Drops the context with everything registered in it.
///
/// Returns whether a context existed.
pub fn shutdown_context() -> bool {
    CONTEXT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .is_some()
}
