//! A process-wide logging facade. Code can log through the functions and macros in this crate at
//! any time. Until a backend has been registered, calls go to a silent [`NopBackend`] that has
//! every level enabled. Registering a backend, usually through [`init_from_env()`] or
//! [`LoggerBuilder::build_global()`], binds it for the rest of the process.
//!
//! ```no_run
//! gatelog::info!("not configured yet, so this goes nowhere");
//!
//! gatelog::LoggerBuilder::new(gatelog::Level::Debug)
//!     .build_global()
//!     .expect("Debug is a valid level");
//! gatelog::info!("value={}", 42);
//! ```

use std::fmt::Arguments;

mod backend;
mod bridge;
mod builder;
pub mod config;
mod level;
mod logger;
mod registry;
mod target;

pub use backend::{Backend, NopBackend, SetLevelError};
pub use bridge::{install_log_bridge, LogBridge};
pub use builder::{BuildError, LoggerBuilder, OutputTarget, SetTargetError};
pub use config::{init_from_env, Config, ConfigError};
pub use level::{Level, ParseLevelError};
pub use logger::StandardBackend;
pub use registry::Registry;
pub use target::CaptureBuffer;

/// The facade's binding. Starts out unbound and is bound once through [`register()`].
static REGISTRY: Registry = Registry::new();

/// The backend calls are currently forwarded to.
#[inline]
fn current() -> &'static dyn Backend {
    REGISTRY.current()
}

/// Bind `backend` to the facade. Every later call through the facade goes to this backend.
///
/// # Panics
///
/// Panics if `backend` is `None`, or if a backend has already been registered. Registration should
/// happen exactly once while the process is starting up.
pub fn register(backend: Option<Box<dyn Backend>>) {
    REGISTRY.register(backend);
}

/// Whether a backend has been registered.
pub fn is_registered() -> bool {
    REGISTRY.is_bound()
}

/// Change the bound backend's minimum level. Errors from the backend are returned unchanged, in
/// which case its level has not changed.
pub fn set_level(level: Level) -> Result<(), SetLevelError> {
    current().set_level(level)
}

/// Flush the bound backend's output.
pub fn flush() {
    current().flush();
}

pub fn is_trace_enabled() -> bool {
    current().is_trace_enabled()
}

pub fn is_debug_enabled() -> bool {
    current().is_debug_enabled()
}

pub fn is_info_enabled() -> bool {
    current().is_info_enabled()
}

pub fn is_warn_enabled() -> bool {
    current().is_warn_enabled()
}

pub fn is_error_enabled() -> bool {
    current().is_error_enabled()
}

pub fn is_fatal_enabled() -> bool {
    current().is_fatal_enabled()
}

/// Log a message at the TRACE level. Usually called through [`trace!()`].
pub fn trace(args: Arguments<'_>) {
    current().trace(args);
}

/// Log a message at the DEBUG level. Usually called through [`debug!()`].
pub fn debug(args: Arguments<'_>) {
    current().debug(args);
}

/// Log a message at the INFO level. Usually called through [`info!()`].
pub fn info(args: Arguments<'_>) {
    current().info(args);
}

/// Log a message at the WARN level. Usually called through [`warn!()`].
pub fn warn(args: Arguments<'_>) {
    current().warn(args);
}

/// Log a message at the ERROR level. Usually called through [`error!()`].
pub fn error(args: Arguments<'_>) {
    current().error(args);
}

/// Log a message at the FATAL level. Usually called through [`fatal!()`]. This only logs, it does
/// not terminate the process.
pub fn fatal(args: Arguments<'_>) {
    current().fatal(args);
}

/// Log a message at the TRACE level using [`format!()`] syntax.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::trace(format_args!($($arg)+))
    };
}

/// Log a message at the DEBUG level using [`format!()`] syntax.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::debug(format_args!($($arg)+))
    };
}

/// Log a message at the INFO level using [`format!()`] syntax.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::info(format_args!($($arg)+))
    };
}

/// Log a message at the WARN level using [`format!()`] syntax.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warn(format_args!($($arg)+))
    };
}

/// Log a message at the ERROR level using [`format!()`] syntax.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::error(format_args!($($arg)+))
    };
}

/// Log a message at the FATAL level using [`format!()`] syntax.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::fatal(format_args!($($arg)+))
    };
}
