//! The binding between the facade and the backend it forwards to.

use once_cell::sync::OnceCell;

use crate::backend::{Backend, NopBackend};
use crate::level::Level;

/// Holds the backend the facade forwards to. A registry starts out unbound, in which case calls go
/// to a silent [`NopBackend`] that has every level enabled. Registering a backend binds it for the
/// rest of the registry's lifetime. There is no way to unbind or replace it.
pub struct Registry {
    /// The registered backend. Written at most once.
    binding: OnceCell<Box<dyn Backend>>,
    /// Handles all calls until `binding` has been set.
    fallback: NopBackend,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            binding: OnceCell::new(),
            fallback: NopBackend::new(Level::Trace),
        }
    }

    /// The backend calls should currently be forwarded to.
    #[inline]
    pub fn current(&self) -> &dyn Backend {
        match self.binding.get() {
            Some(backend) => backend.as_ref(),
            None => &self.fallback,
        }
    }

    /// Whether a backend has been registered.
    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Bind `backend` to this registry.
    ///
    /// # Panics
    ///
    /// Panics if `backend` is `None`, or if a backend has already been registered. Both indicate a
    /// bug in the application's startup code. When two threads race to register a backend, exactly
    /// one of them wins and the other panics.
    pub fn register(&self, backend: Option<Box<dyn Backend>>) {
        let Some(backend) = backend else {
            panic!("gatelog: cannot register an absent backend");
        };

        if self.binding.set(backend).is_err() {
            panic!("gatelog: a backend has already been registered");
        }
    }
}
