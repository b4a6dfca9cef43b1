use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(author, version, about = "Plan data file replacements in statistical releases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the replacement plan for a data file and write it out
    Plan(PlanArgs),
    /// Print whether a replacement is valid; exits non-zero when it is not
    Check(CheckArgs),
    /// Apply a valid replacement to the snapshot's data blocks and footnotes
    Replace(ReplaceArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Release snapshot (.json, .yaml or .yml; '-' for stdin)
    #[arg(short = 's', long = "snapshot")]
    pub snapshot: PathBuf,
    /// Release version containing the original and replacement files
    #[arg(short = 'r', long = "release-version")]
    pub release_version: Uuid,
    /// Id of the data file being replaced
    #[arg(short = 'f', long = "original-file")]
    pub original_file: Uuid,
    /// Planner configuration file (.json, .yaml or .yml)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Allow replacing files that feed a public API data set version
    #[arg(long = "enable-api-replacement", num_args = 0..=1, default_missing_value = "true")]
    pub enable_api_replacement: Option<bool>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
    Csv,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Args)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    /// Where to write the updated snapshot (defaults to overwriting --snapshot)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}
