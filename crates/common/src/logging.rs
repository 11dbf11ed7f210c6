//! Tracing subscriber setup shared by every binary embedding the worker engine.

use tracing_subscriber::EnvFilter;

use crate::config::WorkerConfig;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than
/// once is harmless: later calls return `false` and leave the first
/// subscriber in place.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Same as [`init_logging`] using the filter from a loaded config.
pub fn init_from_config(cfg: &WorkerConfig) -> bool {
    init_logging(&cfg.log_filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let _ = init_logging("debug");
        // second install must not panic and must report the existing subscriber
        assert!(!init_from_config(&WorkerConfig::default()));
    }
}
