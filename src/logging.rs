//! `tracing` subscriber setup.
//!
//! Logs go either to stderr or into the outbound [`SharedLogRing`], from
//! which they are drained to the host link.

use crate::comms::SharedLogRing;

use tracing::Level;

/// Installs a global stderr subscriber. Returns `false` if one is already set.
pub fn init_stderr(max_level: Level) -> bool {
  tracing_subscriber::fmt()
    .with_max_level(max_level)
    .with_writer(std::io::stderr)
    .try_init()
    .is_ok()
}

/// Installs a global subscriber writing plain lines into `ring`.
pub fn init_ring(ring: SharedLogRing, max_level: Level) -> bool {
  tracing::subscriber::set_global_default(ring_subscriber(ring, max_level)).is_ok()
}

/// Subscriber writing plain lines (no color, no timestamps) into `ring`.
pub fn ring_subscriber(
  ring: SharedLogRing,
  max_level: Level,
) -> impl tracing::Subscriber + Send + Sync + 'static {
  tracing_subscriber::fmt()
    .with_max_level(max_level)
    .with_writer(ring)
    .with_ansi(false)
    .without_time()
    .with_target(false)
    .finish()
}
