use gatelog::Level;

fn main() {
    // Nothing has been registered yet, so this is silently discarded
    gatelog::info!("This message goes nowhere");

    gatelog::LoggerBuilder::new(Level::Trace)
        .build_global()
        .expect("Trace is a valid level");

    // When changing the level above some of these messages may no longer be printed
    gatelog::fatal!("This is a fatal error");
    gatelog::error!("This is an error");
    gatelog::warn!("This is a warning");
    gatelog::info!("This is a regular log message");
    gatelog::debug!("This is a debug message, usually only made visible during debug builds");
    gatelog::trace!("This is a trace message, usually hidden unless explicitly opted into");

    if let Err(err) = gatelog::set_level(Level::Warn) {
        gatelog::error!("Could not change the log level: {err}");
    }
    gatelog::info!("This message is no longer printed");
    gatelog::warn!("But warnings still are");
}
