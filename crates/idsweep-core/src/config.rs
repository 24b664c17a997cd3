//! Configuration management for idsweep.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Command-line flags are applied on top by
//! the binary.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the probed ID in URL templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Main application configuration.
///
/// This is loaded from `~/.config/idsweep/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Worker pool and HTTP client settings
    pub scanning: ScanningConfig,
    /// What to probe and what counts as a match
    pub target: TargetConfig,
    /// Adaptive delay bounds
    pub rate: RateConfig,
    /// Result file settings
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `IDSWEEP_WORKERS`: Override worker count
    /// - `IDSWEEP_OUTPUT`: Override results file path
    /// - `IDSWEEP_MARKER`: Override the match marker
    /// - `IDSWEEP_PROBE_URL`: Override the probe URL template
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("IDSWEEP_WORKERS") {
            match val.parse() {
                Ok(workers) => {
                    self.scanning.workers = workers;
                    tracing::debug!("Override scanning.workers from env: {}", workers);
                }
                Err(_) => tracing::debug!("Ignoring unparsable IDSWEEP_WORKERS={}", val),
            }
        }

        if let Some(val) = lookup("IDSWEEP_OUTPUT") {
            tracing::debug!("Override output.path from env: {}", val);
            self.output.path = PathBuf::from(val);
        }

        if let Some(val) = lookup("IDSWEEP_MARKER") {
            tracing::debug!("Override target.marker from env: {}", val);
            self.target.marker = val;
        }

        if let Some(val) = lookup("IDSWEEP_PROBE_URL") {
            tracing::debug!("Override target.probe_url_template from env: {}", val);
            self.target.probe_url_template = val;
        }

        self
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.workers == 0 {
            return Err(ConfigError::invalid(
                "scanning.workers",
                "must be greater than zero",
            ));
        }
        if self.scanning.progress_interval == 0 {
            return Err(ConfigError::invalid(
                "scanning.progress_interval",
                "must be greater than zero",
            ));
        }

        let rate = &self.rate;
        if rate.min_delay_ms > rate.max_delay_ms {
            return Err(ConfigError::invalid(
                "rate.min_delay_ms",
                format!(
                    "{} exceeds max_delay_ms {}",
                    rate.min_delay_ms, rate.max_delay_ms
                ),
            ));
        }
        if !(rate.min_delay_ms..=rate.max_delay_ms).contains(&rate.initial_delay_ms) {
            return Err(ConfigError::invalid(
                "rate.initial_delay_ms",
                format!(
                    "{} is outside [{}, {}]",
                    rate.initial_delay_ms, rate.min_delay_ms, rate.max_delay_ms
                ),
            ));
        }

        for (field, template) in [
            ("target.probe_url_template", &self.target.probe_url_template),
            ("target.match_url_template", &self.target.match_url_template),
        ] {
            if !template.contains(ID_PLACEHOLDER) {
                return Err(ConfigError::invalid(
                    field,
                    format!("template must contain {ID_PLACEHOLDER}"),
                ));
            }
        }

        if self.target.marker.is_empty() {
            return Err(ConfigError::invalid("target.marker", "must not be empty"));
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/idsweep/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "idsweep", "idsweep").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Worker pool and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// User agent string sent with every probe
    pub user_agent: String,
    /// Emit a progress line every this many completed requests
    pub progress_interval: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            request_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            progress_interval: 600,
        }
    }
}

/// Target platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// URL probed for each ID; `{id}` is replaced by the ID
    pub probe_url_template: String,
    /// URL recorded for a match; `{id}` is replaced by the ID
    pub match_url_template: String,
    /// Literal substring whose presence in a 200 body marks a match
    pub marker: String,
    /// Title used when none can be extracted from the body
    pub untitled_placeholder: String,
}

impl TargetConfig {
    /// Probe URL for `id`.
    #[must_use]
    pub fn probe_url(&self, id: u64) -> String {
        self.probe_url_template
            .replace(ID_PLACEHOLDER, &id.to_string())
    }

    /// Public URL recorded for a match on `id`.
    #[must_use]
    pub fn match_url(&self, id: u64) -> String {
        self.match_url_template
            .replace(ID_PLACEHOLDER, &id.to_string())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            probe_url_template: "https://player.vimeo.com/video/{id}".to_string(),
            match_url_template: "https://vimeo.com/{id}".to_string(),
            marker: "user177459844".to_string(),
            untitled_placeholder: "Sin título".to_string(),
        }
    }
}

/// Bounds for the shared adaptive delay, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Delay before the first probe
    pub initial_delay_ms: u64,
    /// Floor the delay decays towards on success
    pub min_delay_ms: u64,
    /// Ceiling the delay grows towards on failure
    pub max_delay_ms: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            min_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

/// Result file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the results file, created (or truncated) when the sweep ends
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("resultados.txt"),
        }
    }
}
