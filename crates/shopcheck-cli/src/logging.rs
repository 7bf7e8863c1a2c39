//! Tracing subscriber setup

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber on stderr.
///
/// `RUST_LOG` wins over the verbosity flags. A second call is a no-op.
pub fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
}
