pub mod env_file;
pub mod settings;
pub mod tags;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "panos-tagger")]
#[command(about = "Create tags on PAN-OS firewalls and commit them")]
pub struct CliConfig {
    /// File with one tag name per line
    pub tags_file: PathBuf,

    /// Env file holding API_KEY and PAN (defaults to .env beside the executable)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// TOML settings file for transport, retry and commit options
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the per-device results as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Show the planned requests without contacting any device
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("tags_file", &self.tags_file.to_string_lossy())?;
        if let Some(report) = &self.report {
            validation::validate_non_empty_string("report", &report.to_string_lossy())?;
        }
        Ok(())
    }
}
