use console::Style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => Style::new().red().bold(),
        Level::Warn => Style::new().yellow(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().cyan(),
        Level::Trace => Style::new().dim(),
    }
}

/// Send log records to stderr so stdout carries nothing but report output.
/// Must run after the configuration is initialized.
pub fn init_logging() {
    let log_config = config().log();
    let use_color = colors_enabled();

    // A logger may already be installed (e.g. in tests); keep the existing one
    let _ = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            let label = if use_color {
                level_style(level).apply_to(level).to_string()
            } else {
                level.to_string()
            };
            out.finish(format_args!("[{label}] {message}"))
        })
        .level(level_filter(log_config.level()))
        // sqlx logs every statement at info
        .level_for("sqlx", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply();
}
