//! Diagnostic logging setup.
//!
//! Logs always go to stderr so they never interleave with application
//! output on stdout.

use std::str::FromStr;

use tracing_subscriber::{
    filter::{LevelFilter, ParseError, Targets},
    fmt::Layer,
    prelude::*,
};

/// Environment variable holding a targets directive.
pub const LOG_ENV: &str = "GENIX_LOG";

/// Build the filter.
///
/// A directive (from [`LOG_ENV`] or the `log` setting) wins; otherwise
/// everything logs at `warn`, raised to `debug` for this crate by `debug`.
pub fn filter(directive: Option<&str>, debug: bool) -> Result<Targets, ParseError> {
    if let Some(d) = directive.map(str::trim).filter(|d| !d.is_empty()) {
        return Targets::from_str(d);
    }
    let targets = Targets::new().with_default(LevelFilter::WARN);
    Ok(if debug {
        targets.with_target("genix", LevelFilter::DEBUG)
    } else {
        targets
    })
}

/// Install the global subscriber.
///
/// `setting` is the `log` rc setting; the environment variable takes
/// precedence over it.  A bad directive falls back to the default filter
/// and is reported once the subscriber is up.
pub fn init(setting: Option<&str>, debug: bool) {
    let env = std::env::var(LOG_ENV).ok();
    let directive = env.as_deref().or(setting);

    let (targets, bad) = match filter(directive, debug) {
        Ok(t) => (t, None),
        Err(e) => (filter(None, debug).unwrap_or_default(), Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(targets),
        )
        .try_init();

    if let Some(e) = bad {
        tracing::warn!(error = %e, "ignoring invalid log directive");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn default_is_warn() {
        let t = filter(None, false).unwrap();
        assert!(t.would_enable("genix::calc", &Level::WARN));
        assert!(!t.would_enable("genix::calc", &Level::INFO));
    }

    #[test]
    fn debug_flag_raises_own_target() {
        let t = filter(None, true).unwrap();
        assert!(t.would_enable("genix::vfs", &Level::DEBUG));
        assert!(!t.would_enable("genix::vfs", &Level::TRACE));
        assert!(!t.would_enable("other_crate", &Level::DEBUG));
    }

    #[test]
    fn directive_wins_over_flag() {
        let t = filter(Some("genix=trace"), false).unwrap();
        assert!(t.would_enable("genix::calc::shunt", &Level::TRACE));

        let t = filter(Some("genix=error"), true).unwrap();
        assert!(!t.would_enable("genix::calc", &Level::DEBUG));
    }

    #[test]
    fn blank_directive_is_ignored() {
        let t = filter(Some("  "), false).unwrap();
        assert!(t.would_enable("genix", &Level::WARN));
    }

    #[test]
    fn bad_directive_is_an_error() {
        assert!(filter(Some("genix=loud"), false).is_err());
    }
}
