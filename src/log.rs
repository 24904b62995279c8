//! Logging setup. Every log line is emitted on stderr as a PACE comment (prefixed by `c`),
//! so that a solver may log freely while writing its solution to stdout.

use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// Installs the global logger with the given maximum level. The level may be overridden by
/// the `RUST_LOG` environment variable. Calling this function more than once (e.g. from
/// several tests) is harmless; only the first call has an effect.
pub fn build_pace_logger_for_level(level: LevelFilter) {
    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "c {:>5} [{:>8} ms] {}",
                record.level(),
                start_time().elapsed().as_millis(),
                record.args()
            )
        })
        .try_init();
}

/// Same as [`build_pace_logger_for_level`], where the level is raised by `verbosity` steps
/// above `base` (e.g. `Warn` with verbosity 2 becomes `Debug`)
pub fn build_pace_logger_for_verbosity(base: LevelFilter, verbosity: usize) {
    let index = (base as usize + verbosity).min(LEVELS.len() - 1);
    build_pace_logger_for_level(LEVELS[index]);
}

fn start_time() -> &'static std::time::Instant {
    static START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    START.get_or_init(std::time::Instant::now)
}
