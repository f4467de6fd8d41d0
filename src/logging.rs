//! Logging setup on top of the `log` facade and `env_logger`.
//!
//! The level comes from `RUST_LOG` when it is set, otherwise from the CLI:
//! `--quiet` keeps errors only, `-v` enables debug, `-vv` trace, and the
//! default is `warn` so per-file reports on stdout stay clean.
//!
//! ```rust,no_run
//! use nginx_cache_info::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("decoding headers");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logger. Call once, before any logging.
///
/// # Panics
///
/// Panics if a logger is already installed.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);
    builder.init();

    if from_env {
        log::debug!("Logging initialized from RUST_LOG: {:?}", env::var("RUST_LOG").ok());
    } else {
        log::debug!("Logging initialized at level: {:?}", log::max_level());
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Plain `LEVEL message` by default. `-v` names the emitting module,
/// relative to this crate; `-vv` also stamps each line with milliseconds.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 2 {
            write!(buf, "{} ", buf.timestamp_millis())?;
        }
        write!(buf, "{style}{level:<5}{style:#} ")?;
        if verbose >= 1 {
            write!(buf, "[{}] ", short_target(record.target()))?;
        }
        writeln!(buf, "{}", record.args())
    });
}

/// Strip the crate prefix from a log target: `nginx_cache_info::codec::patch`
/// becomes `codec::patch`. Targets from other crates pass through.
fn short_target(target: &str) -> &str {
    match target.strip_prefix(env!("CARGO_CRATE_NAME")) {
        Some("") => "main",
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level_default() {
        assert_eq!(determine_level(0, false), LevelFilter::Warn);
    }

    #[test]
    fn test_determine_level_verbose() {
        assert_eq!(determine_level(1, false), LevelFilter::Debug);
        assert_eq!(determine_level(2, false), LevelFilter::Trace);
        assert_eq!(determine_level(5, false), LevelFilter::Trace);
    }

    #[test]
    fn test_determine_level_quiet_overrides_verbose() {
        assert_eq!(determine_level(0, true), LevelFilter::Error);
        assert_eq!(determine_level(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("nginx_cache_info::codec::patch"), "codec::patch");
        assert_eq!(short_target("nginx_cache_info"), "main");
        assert_eq!(short_target("walkdir"), "walkdir");
        assert_eq!(short_target("nginx_cache_info_extra::x"), "nginx_cache_info_extra::x");
    }
}
