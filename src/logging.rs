use tracing_subscriber::{fmt, EnvFilter};

/// Default filter level: warnings only, or debug output with `--verbose`
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "stealth_scout=debug,warn"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber, writing to stderr so report output on
/// stdout stays clean. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
