//! idsweep Core - Foundation crate for the idsweep ID-space prober.
//!
//! This crate provides the shared types, configuration management and
//! configuration errors that the scanner engine and the command-line shell
//! depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared domain types (`ScanRange`, `MatchRecord`)
//!
//! # Example
//!
//! ```rust
//! use idsweep_core::{AppConfig, ScanRange};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.workers, 10);
//!
//! let range = ScanRange::new(1, 100);
//! assert_eq!(range.len(), 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, OutputConfig, RateConfig, ScanningConfig, TargetConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{MatchRecord, ScanRange, TIMESTAMP_FORMAT};
