//! Logging initialization.
//!
//! `tracing` subscriber writing to stderr, pretty or JSON lines. `RUST_LOG`
//! wins over everything else when set.

use lookout_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events are shown at the chosen level. Everything else
/// (hyper, reqwest internals) stays at warn.
const OWN_TARGETS: &[&str] = &["lookout", "lookout_core", "tower_http"];

/// Filter directive string for `level`, e.g. `warn,lookout=debug,...`.
fn directives(level: &str) -> String {
    let mut out = String::from("warn");
    for target in OWN_TARGETS {
        out.push_str(&format!(",{target}={level}"));
    }
    out
}

/// Resolve the effective level from config and the `--verbose` flag.
fn effective_level(config: &Config, verbose: bool) -> &str {
    match config.logging.level.as_str() {
        "trace" => "trace",
        _ if verbose => "debug",
        "error" | "warn" | "info" | "debug" => &config.logging.level,
        other => {
            eprintln!("Warning: unknown logging.level '{other}', using info");
            "info"
        }
    }
}

/// Install the global subscriber.
pub fn init(level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section plus CLI overrides.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let json_format = json_logs || config.logging.format == "json";
    init(effective_level(config, verbose), json_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(
            directives("debug"),
            "warn,lookout=debug,lookout_core=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_effective_level() {
        let mut config = Config::default();
        assert_eq!(effective_level(&config, false), "info");
        assert_eq!(effective_level(&config, true), "debug");

        config.logging.level = "trace".to_string();
        assert_eq!(effective_level(&config, true), "trace");

        config.logging.level = "loud".to_string();
        assert_eq!(effective_level(&config, false), "info");
    }
}
