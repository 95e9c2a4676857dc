//! The contract every logging backend implements, and the silent backend used until a real one has
//! been registered.

use std::error::Error;
use std::fmt::{Arguments, Display};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::level::Level;

/// A backend that the facade can forward log calls to. Backends gate messages themselves, the
/// facade never decides whether a message is worth emitting.
///
/// Backends are shared by every thread in the process, so changing the minimum level through
/// [`set_level()`][Self::set_level()] needs to be synchronized by the backend itself.
pub trait Backend: Send + Sync {
    /// Whether a message at `level` would currently be emitted.
    fn enabled(&self, level: Level) -> bool;

    /// Emit a message at `level`. Messages below the backend's minimum level are discarded.
    fn log(&self, level: Level, args: Arguments<'_>);

    /// Change the minimum level. If this returns an error, the backend's level and gate are left
    /// exactly as they were.
    fn set_level(&self, level: Level) -> Result<(), SetLevelError>;

    /// Flush any buffered output.
    fn flush(&self) {}

    fn is_trace_enabled(&self) -> bool {
        self.enabled(Level::Trace)
    }

    fn is_debug_enabled(&self) -> bool {
        self.enabled(Level::Debug)
    }

    fn is_info_enabled(&self) -> bool {
        self.enabled(Level::Info)
    }

    fn is_warn_enabled(&self) -> bool {
        self.enabled(Level::Warn)
    }

    fn is_error_enabled(&self) -> bool {
        self.enabled(Level::Error)
    }

    fn is_fatal_enabled(&self) -> bool {
        self.enabled(Level::Fatal)
    }

    fn trace(&self, args: Arguments<'_>) {
        self.log(Level::Trace, args);
    }

    fn debug(&self, args: Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn warn(&self, args: Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn error(&self, args: Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn fatal(&self, args: Arguments<'_>) {
        self.log(Level::Fatal, args);
    }
}

/// An error raised when a backend could not apply a new minimum level.
#[derive(Debug)]
pub enum SetLevelError {
    /// [`Level::Unknown`] was passed as the new minimum level.
    UnknownLevel,
    /// The backend's log file could not be reopened with the new configuration.
    FileOpenError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl Error for SetLevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SetLevelError::UnknownLevel => None,
            SetLevelError::FileOpenError { error, .. } => Some(error),
        }
    }
}

impl Display for SetLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetLevelError::UnknownLevel => write!(f, "Cannot use an unknown level as the minimum"),
            SetLevelError::FileOpenError { path, error } => {
                write!(f, "Could not reopen '{}' ({})", path.display(), error)
            }
        }
    }
}

/// A backend that discards everything. This is bound to the facade until a real backend is
/// registered, so logging before configuration is silent instead of an error.
#[derive(Debug)]
pub struct NopBackend {
    /// Stored as the level's `u8` representation so the backend can live in a `static`.
    level: AtomicU8,
}

impl NopBackend {
    pub const fn new(level: Level) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
        }
    }

    /// The currently stored minimum level.
    pub fn level(&self) -> Level {
        Level::from(self.level.load(Ordering::Relaxed))
    }
}

impl Default for NopBackend {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl Backend for NopBackend {
    #[inline]
    fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level())
    }

    #[inline]
    fn log(&self, _level: Level, _args: Arguments<'_>) {}

    fn set_level(&self, level: Level) -> Result<(), SetLevelError> {
        // There's nothing to reconfigure, so this cannot fail
        self.level.store(level as u8, Ordering::Relaxed);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NopBackend>();
    }

    #[test]
    fn nop_backend_defaults_to_everything_enabled() {
        let backend = NopBackend::default();
        assert!(backend.is_trace_enabled());
        assert!(backend.is_debug_enabled());
        assert!(backend.is_info_enabled());
        assert!(backend.is_warn_enabled());
        assert!(backend.is_error_enabled());
        assert!(backend.is_fatal_enabled());
    }

    #[test]
    fn nop_backend_gates_against_stored_level() {
        let backend = NopBackend::new(Level::Warn);
        assert!(!backend.is_trace_enabled());
        assert!(!backend.is_debug_enabled());
        assert!(!backend.is_info_enabled());
        assert!(backend.is_warn_enabled());
        assert!(backend.is_error_enabled());
        assert!(backend.is_fatal_enabled());
    }

    #[test]
    fn nop_backend_set_level_never_fails() {
        let backend = NopBackend::default();
        for level in Level::ALL {
            backend.set_level(level).expect("nop backend cannot fail");
            assert_eq!(backend.level(), level);
            for other in Level::ALL {
                assert_eq!(backend.enabled(other), other >= level);
            }
        }
    }

    #[test]
    fn nop_backend_as_trait_object() {
        let backend: Box<dyn Backend> = Box::new(NopBackend::default());
        backend.trace(format_args!("trace {}", 1));
        backend.debug(format_args!("debug"));
        backend.info(format_args!("value={}", 42));
        backend.warn(format_args!("warn"));
        backend.error(format_args!("error"));
        backend.fatal(format_args!("fatal"));
        backend.flush();
        assert!(backend.is_trace_enabled());
    }
}
