//! stderr logger behind the `log` facade.
//!
//! Lines look like `[INFO] message`. Engine diagnostics pass indented
//! messages through unchanged, so nested lines read `[INFO]    message`.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_line(record.level(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

/// Install the logger and apply `level`.
///
/// The level is applied even when another logger is already installed, in
/// which case that logger stays and the error is returned.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}

/// Level from the global `-q` / `-v` flags; quiet wins.
pub fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn format_line(level: Level, message: &str) -> String {
    let tag = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("[{tag}] {message}")
}
