//! Forwards records from the [`log`] crate's macros to the facade, so dependencies that log through
//! `log` end up at the same backend.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::level::Level;
use crate::registry::Registry;

/// A [`log::Log`] implementation that forwards to whatever backend `registry` is bound to at the
/// time of the call.
pub struct LogBridge {
    registry: &'static Registry,
}

impl LogBridge {
    pub const fn new(registry: &'static Registry) -> Self {
        Self { registry }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.registry
            .current()
            .enabled(from_log_level(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let level = from_log_level(record.level());
        let backend = self.registry.current();
        if backend.enabled(level) {
            backend.log(level, *record.args());
        }
    }

    fn flush(&self) {
        self.registry.current().flush();
    }
}

/// `log` has no level above `Error`, so nothing maps to [`Level::Fatal`].
fn from_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Trace,
    }
}

/// Install a bridge to the process-wide facade as the [`log`] crate's logger. `log`'s own level
/// filter is left fully open since the backend's gate can change at any time through
/// [`crate::set_level()`].
pub fn install_log_bridge() -> Result<(), SetLoggerError> {
    static BRIDGE: LogBridge = LogBridge::new(&crate::REGISTRY);

    log::set_logger(&BRIDGE)?;
    log::set_max_level(LevelFilter::Trace);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{LoggerBuilder, OutputTarget};
    use crate::target::CaptureBuffer;

    fn leaked_registry() -> &'static Registry {
        Box::leak(Box::new(Registry::new()))
    }

    #[test]
    fn levels_map_by_name() {
        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            assert!(from_log_level(level)
                .as_str()
                .eq_ignore_ascii_case(level.as_str()));
        }
    }

    #[test]
    fn unbound_bridge_is_silent_but_enabled() {
        let bridge = LogBridge::new(leaked_registry());
        let metadata = Metadata::builder().level(log::Level::Trace).build();
        assert!(bridge.enabled(&metadata));

        bridge.log(
            &Record::builder()
                .level(log::Level::Info)
                .args(format_args!("ignored"))
                .build(),
        );
        bridge.flush();
    }

    #[test]
    fn records_reach_the_bound_backend() {
        let registry = leaked_registry();
        let buffer = CaptureBuffer::new();
        let backend = LoggerBuilder::new(Level::Info)
            .with_output_target(OutputTarget::Capture(buffer.clone()))
            .unwrap()
            .with_format("{level} {message}")
            .build()
            .unwrap();
        registry.register(Some(Box::new(backend)));

        let bridge = LogBridge::new(registry);
        assert!(!bridge.enabled(&Metadata::builder().level(log::Level::Debug).build()));
        assert!(bridge.enabled(&Metadata::builder().level(log::Level::Warn).build()));

        for (level, message) in [
            (log::Level::Debug, "dropped"),
            (log::Level::Info, "value=42"),
            (log::Level::Error, "boom"),
        ] {
            bridge.log(
                &Record::builder()
                    .level(level)
                    .args(format_args!("{message}"))
                    .build(),
            );
        }

        assert_eq!(buffer.lines(), vec!["INFO value=42", "ERROR boom"]);
    }
}
