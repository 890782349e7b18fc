use log::LevelFilter;

/// Install the logger for the application
///
/// Logs go to stderr. Level is Debug in development builds and Info in
/// production builds; `RUST_LOG` overrides the default and `level` overrides both.
pub fn init(level: Option<LevelFilter>) {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp_millis();
    if let Some(level) = level {
        builder.filter_level(level);
    }

    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}
