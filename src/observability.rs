//! Logging setup for the binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Installs a `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` directives are honoured; `pv_match=info` is added as a default
/// so stage summaries show up without configuration. Calling it twice is a
/// no-op.
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(
        "pv_match=info"
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
