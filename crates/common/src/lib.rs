//! # WPS Common Crate
//!
//! Shared plumbing for the worker proposal system crates.
//!
//! ## Modules
//! - `config`: `WorkerConfig` loaded from TOML
//! - `logging`: tracing subscriber setup
//!
//! ## Usage
//! ```rust,ignore
//! let cfg = wps_common::config::load_from_file("worker.toml")?;
//! wps_common::logging::init_from_config(&cfg);
//! ```

pub mod config;
pub mod logging;

pub use config::{load_from_file, WorkerConfig};

pub type Result<T> = anyhow::Result<T>;
