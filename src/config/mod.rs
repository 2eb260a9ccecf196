//! Configuration management

use super::types::SortError;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "photosorter", version, about, long_about = None)]
pub struct Cli {
    /// Source directory where photos are uploaded
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Target directory in which year directories are created
    #[arg(short = 't', long = "target", value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Leave failed copies out of the seen list so the next pass retries them
    #[arg(long)]
    pub retry_failed: bool,
}

/// Process-wide configuration, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source directory (watched, non-recursive)
    pub source: PathBuf,

    /// Target root holding the year directories
    pub target: PathBuf,

    /// Whether a failed copy stays out of the seen list
    pub retry_failed: bool,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SortError> {
        if !self.source.is_dir() {
            return Err(SortError::Config(format!(
                "Source directory does not exist: {:?}",
                self.source
            )));
        }

        if self.source == self.target {
            return Err(SortError::Config(
                "Source and target cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = SortError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let (Some(source), Some(target)) = (cli.source, cli.target) else {
            return Err(SortError::Config(
                "Source and target paths must both be provided (-s <DIR> -t <DIR>)".to_string(),
            ));
        };

        let config = Config {
            source,
            target,
            retry_failed: cli.retry_failed,
        };
        config.validate()?;
        Ok(config)
    }
}
