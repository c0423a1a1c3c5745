use persistence::Configuration;
use tracing_subscriber::{EnvFilter, prelude::*};

const LOG_LEVEL_KEY: &str = "Logging:LogLevel:Default";
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over everything; otherwise `--verbose` selects `debug`,
/// then the settings file's default log level, then `info`.
pub fn init(verbose: bool, configuration: Option<&Configuration>) {
    let fallback = if verbose {
        "debug"
    } else {
        configuration
            .and_then(|c| c.get(LOG_LEVEL_KEY))
            .and_then(directive_for)
            .unwrap_or(DEFAULT_FILTER)
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(verbose);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Maps a `Logging:LogLevel` value onto a tracing filter directive.
fn directive_for(level: &str) -> Option<&'static str> {
    let directive = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "information" | "info" => "info",
        "warning" | "warn" => "warn",
        "error" | "critical" => "error",
        "none" | "off" => "off",
        _ => return None,
    };
    Some(directive)
}
