//! Worker engine config loader using TOML and serde.
//! The config struct stays small and typed; consensus constants are NOT
//! configurable here (thresholds derive from the live committee size).

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::Result;

/// Default number of top-voted witness seats forming the approval committee.
pub const DEFAULT_COMMITTEE_SEATS: u32 = 19;

/// Default capacity of the in-memory worker event log (FIFO).
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1_000;

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of top-ranked witnesses that sit in the approval committee.
    pub committee_seats: u32,

    /// Maximum number of worker events kept in memory.
    /// Events are observability only and never enter the state root.
    pub event_log_capacity: usize,

    /// Tracing filter used when `RUST_LOG` is not set (e.g. "info", "wps_chain=debug").
    pub log_filter: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            committee_seats: DEFAULT_COMMITTEE_SEATS,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Reject configurations no node could run with.
    pub fn validate(&self) -> Result<()> {
        if self.committee_seats == 0 {
            anyhow::bail!("committee_seats must be greater than 0");
        }
        if self.event_log_capacity == 0 {
            anyhow::bail!("event_log_capacity must be greater than 0");
        }
        Ok(())
    }
}

/// Load config from a TOML file path.
/// Missing keys fall back to defaults; a missing file or a parse failure is an error.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<WorkerConfig> {
    let p = path.as_ref();
    let s = fs::read_to_string(p)
        .with_context(|| format!("reading worker config {}", p.display()))?;
    let cfg: WorkerConfig = toml::from_str(&s)
        .with_context(|| format!("parsing worker config {}", p.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
