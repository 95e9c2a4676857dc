fn main() {
    // Reads the configuration file named by `GATELOG_CONFIG`, falling back to the defaults with a
    // warning if it is missing or invalid
    gatelog::init_from_env();
    gatelog::install_log_bridge().expect("No other `log` logger has been installed");

    gatelog::info!("Configured from the environment");
    log::info!("Messages from the log crate end up at the same backend");

    if gatelog::is_debug_enabled() {
        let expensive = (1..=10).product::<u64>();
        gatelog::debug!("10! = {expensive}");
    }
}
