use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("could not build request for ID {id}: {reason}")]
    InvalidRequest { id: u64, reason: String },

    #[error("failed to read response body for ID {id}: {reason}")]
    BodyRead { id: u64, reason: String },

    #[error("could not write results to {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Whether the error only drops the job it occurred on.
    #[must_use]
    pub fn is_job_local(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. } | Self::BodyRead { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
