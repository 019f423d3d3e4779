pub const DEFAULT_CONFIG_FILE: &'static str = "./etlmaint_config.json";

/// Records go to stderr (simple_logger's `stderr` feature); stdout carries only outcome lines.
pub fn init_logging() {
    if let Err(e) = simple_logger::SimpleLogger::new().env().init() {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Applies the configured level, unless RUST_LOG already chose one
pub fn enable_logging(max_level: log::LevelFilter) {
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(max_level);
    }
}
