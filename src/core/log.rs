//! Tracing setup for the `hedgewise` binary.
//!
//! Pipeline progress is logged at `info` and per-stage figures at `debug`,
//! all under the `hedgewise` target. Output stays silent unless `--verbose`
//! is passed or `RUST_LOG` asks for it.
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber.
///
/// `verbose` enables `debug` output for the crate's own target; `RUST_LOG`,
/// when set, replaces the fallback directive and can narrow or widen it.
/// Call once, before the first command runs.
pub fn init_logging(verbose: bool) {
    let (crate_level, fallback_directive) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    let crate_targets = Targets::new().with_target("hedgewise", crate_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(crate_targets)
        .with(env_filter)
        .init();
}
