//! Final sweep report and the results file.

use crate::error::{Result, ScanError};
use idsweep_core::MatchRecord;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Aggregate outcome of a finished sweep.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Wall-clock time from feeder start to the last worker joining
    pub elapsed: Duration,
    /// Requests that completed (any status or transport failure)
    pub requests_issued: u64,
    /// Confirmed matches
    pub matches_found: u64,
    /// Shared delay when the sweep ended
    pub final_delay: Duration,
    /// Every match, in discovery order
    pub matches: Vec<MatchRecord>,
}

impl ScanReport {
    /// Write one line per match to `writer`.
    pub fn write_lines<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in &self.matches {
            writeln!(
                writer,
                "ID: {}, URL: {}, Encontrado: {}",
                record.id,
                record.url,
                record.discovered_at_display()
            )?;
        }
        writer.flush()
    }

    /// Create (or truncate) `path` and write every match to it.
    ///
    /// The file is created even when there are no matches.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let to_output_error = |source| ScanError::OutputFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_output_error)?;
        self.write_lines(BufWriter::new(file))
            .map_err(to_output_error)?;

        tracing::info!(
            "Wrote {} matches to {}",
            self.matches.len(),
            path.display()
        );
        Ok(())
    }

    /// Human-readable summary printed at the end of a run.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Matches found: {}\nRequests issued: {}\nElapsed: {:.2} seconds",
            self.matches_found,
            self.requests_issued,
            self.elapsed.as_secs_f64()
        )
    }
}
