//! idsweep command-line shell.
//!
//! This is the thin layer that merges flags with configuration, installs
//! logging and runs the sweep. The engine lives in `crates/idsweep-scanner`.

pub mod cli;

pub use cli::Cli;

use anyhow::Context;
use idsweep_core::AppConfig;
use idsweep_scanner::{HttpProber, ScanOrchestrator, ScanReport};
use std::sync::Arc;
use tracing::info;

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,idsweep=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Resolve the effective configuration for `cli`.
///
/// Precedence: defaults, then the config file, then `IDSWEEP_*` variables,
/// then flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load().context("loading config")?,
    };

    let mut config = config.with_env_overrides();
    cli.apply_to(&mut config);
    config.validate().context("validating config")?;
    Ok(config)
}

/// Run a full sweep and write the results file.
pub async fn run(cli: &Cli) -> anyhow::Result<ScanReport> {
    let config = resolve_config(cli)?;
    run_with_config(cli, &config).await
}

/// Run a sweep with an already resolved configuration.
///
/// Failing to write the results file is the only fatal error once the sweep
/// has started.
pub async fn run_with_config(cli: &Cli, config: &AppConfig) -> anyhow::Result<ScanReport> {
    info!(
        "Starting idsweep v{} for IDs {} to {}",
        env!("CARGO_PKG_VERSION"),
        cli.start,
        cli.end
    );

    let prober = HttpProber::new(&config.scanning, config.target.clone())?;
    let orchestrator = ScanOrchestrator::new(Arc::new(prober), config);

    let report = orchestrator.run(cli.range()).await;
    report.write_to(&config.output.path)?;
    Ok(report)
}
