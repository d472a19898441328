//! Tracing initialisation for the binary.
//!
//! The library itself only emits `tracing` events; with no subscriber
//! installed they are no-ops, which keeps the pipeline silent (and testable)
//! by default. The CLI calls [`init_tracing`] once at startup.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG` for fine-grained filtering; when unset, `verbose`
/// picks between DEBUG and WARN as the default level. Log lines go to
/// stderr so command output stays clean. Safe to call more than once; only
/// the first call takes effect.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
