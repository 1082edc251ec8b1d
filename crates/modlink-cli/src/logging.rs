//! stderr subscriber for the `modlink` binary.
//!
//! `modlink-core` emits `tracing` events and never installs a subscriber.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets whose level follows `-v`.
const TARGETS: [&str; 2] = ["modlink_core", "modlink_cli"];

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG` (or `warn`) for everything, `-v` for our own targets.
fn build_filter(verbosity: u8) -> EnvFilter {
    let level = level_for(verbosity);
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    TARGETS.iter().fold(base, |filter, target| {
        match format!("{target}={level}").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    })
}

/// Install the global subscriber. Events always go to stderr; with `json`
/// each event is one flattened JSON object per line.
pub fn init(verbosity: u8, json: bool) {
    let registry = tracing_subscriber::registry().with(build_filter(verbosity));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        registry
            .with(layer.json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        registry.with(layer.with_target(false).without_time()).init();
    }
}
