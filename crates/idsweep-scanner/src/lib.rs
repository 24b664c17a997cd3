//! idsweep Scanner - Adaptive concurrent probing over sequential ID spaces.
//!
//! This crate walks a closed range of numeric IDs, probes each one exactly
//! once over HTTP, and records the IDs whose response carries a marker. A
//! fixed pool of workers shares one adaptive delay that backs off on
//! failures and recovers on matches.
//!
//! # Features
//!
//! - Bounded job queue with backpressure and exactly-once delivery
//! - Fixed-size worker pool joined before results are read
//! - Shared multiplicative increase/decrease request spacing
//! - Lock-free request and match counters
//! - Results file written once the sweep is complete
//!
//! # Example
//!
//! ```rust,ignore
//! use idsweep_core::{AppConfig, ScanRange};
//! use idsweep_scanner::{HttpProber, ScanOrchestrator};
//! use std::sync::Arc;
//!
//! let config = AppConfig::default();
//! let prober = HttpProber::new(&config.scanning, config.target.clone())?;
//! let orchestrator = ScanOrchestrator::new(Arc::new(prober), &config);
//!
//! let report = orchestrator.run(ScanRange::new(1, 1_000)).await;
//! report.write_to(&config.output.path)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
#[allow(missing_docs)]
pub mod error;
pub mod feeder;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
pub mod probe;
pub mod rate;
pub mod report;

// Re-export commonly used types
pub use aggregator::ResultAggregator;
pub use error::{Result, ScanError};
pub use feeder::{spawn_feeder, JobQueue};
pub use orchestrator::ScanOrchestrator;
pub use parser::{classify_body, extract_title};
pub use probe::{HttpProber, ProbeOutcome, Prober};
pub use rate::RateController;
pub use report::ScanReport;
