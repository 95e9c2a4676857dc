//! The facade's whole lifecycle in a single process: unbound, registered, and reconfigured.

use gatelog::{CaptureBuffer, Level, LoggerBuilder, OutputTarget, SetLevelError};

#[test]
fn facade_lifecycle() {
    // Before registration everything is enabled, and everything goes nowhere
    assert!(!gatelog::is_registered());
    assert!(gatelog::is_trace_enabled());
    assert!(gatelog::is_debug_enabled());
    assert!(gatelog::is_info_enabled());
    assert!(gatelog::is_warn_enabled());
    assert!(gatelog::is_error_enabled());
    assert!(gatelog::is_fatal_enabled());
    gatelog::info!("value={}", 42);
    gatelog::fatal!("unconfigured");
    gatelog::flush();

    let buffer = CaptureBuffer::new();
    LoggerBuilder::new(Level::Debug)
        .with_output_target(OutputTarget::Capture(buffer.clone()))
        .unwrap()
        .build_global()
        .unwrap();
    assert!(gatelog::is_registered());
    assert!(buffer.contents().is_empty());
    assert!(!gatelog::is_trace_enabled());
    assert!(gatelog::is_debug_enabled());

    gatelog::info!("value={}", 42);
    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[INFO]"), "{}", lines[0]);
    assert!(lines[0].ends_with("value=42"), "{}", lines[0]);

    gatelog::set_level(Level::Error).unwrap();
    gatelog::info!("value={}", 43);
    assert_eq!(buffer.lines().len(), 1);

    gatelog::error!("boom");
    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("[ERROR] boom"), "{}", lines[1]);

    // A rejected level change keeps the previous gate
    assert!(matches!(
        gatelog::set_level(Level::Unknown),
        Err(SetLevelError::UnknownLevel)
    ));
    assert!(!gatelog::is_warn_enabled());
    assert!(gatelog::is_error_enabled());
    assert!(gatelog::is_fatal_enabled());

    // Records from the `log` crate end up at the same backend
    gatelog::install_log_bridge().unwrap();
    log::warn!("filtered by the backend");
    log::error!("via {}", "log");
    let lines = buffer.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with("[ERROR] via log"), "{}", lines[2]);
}
