use clap::error::ErrorKind;
use clap::{value_parser, Parser};
use idsweep_core::{AppConfig, ScanRange};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "idsweep")]
#[command(about = "Probe every ID in a range and record those whose page carries a marker")]
#[command(version)]
pub struct Cli {
    /// First ID to probe
    #[arg(long, value_parser = value_parser!(u64).range(1..))]
    pub start: u64,

    /// Last ID to probe (inclusive)
    #[arg(long, value_parser = value_parser!(u64).range(1..))]
    pub end: u64,

    /// Number of concurrent workers [default: 10]
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Results file [default: resultados.txt]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the XDG config path)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse process arguments.
    ///
    /// Usage errors print the message and exit with status 1; `--help` and
    /// `--version` exit with status 0.
    #[must_use]
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let _ = e.print();
                std::process::exit(1);
            }
        }
    }

    /// ID range requested on the command line.
    #[must_use]
    pub fn range(&self) -> ScanRange {
        ScanRange::new(self.start, self.end)
    }

    /// Apply flags on top of file and environment configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(threads) = self.threads {
            config.scanning.workers = threads;
        }
        if let Some(output) = &self.output {
            config.output.path.clone_from(output);
        }
    }
}
