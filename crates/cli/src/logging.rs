//! Tracing setup for the `apigen` binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log level or filter spec.
pub const LOG_ENV: &str = "APIGEN_LOG";

const CRATES: [&str; 2] = ["apigen_core", "apigen_cli"];

fn is_plain_level(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}

/// Filter directives for a given `APIGEN_LOG` value.
fn filter_spec(env_value: Option<&str>) -> String {
    let per_crate = |level: &str| {
        CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    };
    match env_value {
        Some(level) if is_plain_level(level) => per_crate(&level.to_ascii_lowercase()),
        Some(spec) => spec.to_string(),
        None => per_crate("info"),
    }
}

/// Install the global fmt subscriber writing to stderr, filtered by
/// [`LOG_ENV`].
pub fn init_tracing() {
    // APIGEN_LOG is either a plain level ("debug") applied to the workspace
    // crates, or a full filter spec like "apigen_core=trace,apigen_cli=warn".
    let env_value = std::env::var(LOG_ENV).ok();
    let filter = filter_spec(env_value.as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}
