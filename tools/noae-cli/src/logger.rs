use std::sync::OnceLock;

use console::{style, Term};
use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<TermLogger> = OnceLock::new();

/// Writes log records to stderr.
struct TermLogger {
    term: Term,
}

impl Log for TermLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = match record.level() {
            Level::Error => style("error").red().bold(),
            Level::Warn => style("warn").yellow(),
            Level::Info => style("info").green(),
            Level::Debug => style("debug").cyan(),
            Level::Trace => style("trace").dim(),
        };
        let _ = self
            .term
            .write_line(&format!("{level} [{}] {}", record.target(), record.args()));
    }

    fn flush(&self) {
        let _ = self.term.flush();
    }
}

/// Install the stderr logger. Later calls only change the level.
pub fn init(level: LevelFilter) {
    let logger = LOGGER.get_or_init(|| TermLogger {
        term: Term::stderr(),
    });
    let _ = log::set_logger(logger);
    log::set_max_level(level);
}
