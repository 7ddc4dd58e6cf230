use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "checkxml")]
#[command(about = "Resolve HTML named entities and check that XML documents are well-formed")]
pub struct CheckXmlArgs {
    /// XML files to check, in order
    pub files: Vec<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit with status 1 when any file is malformed
    #[arg(long)]
    pub strict: bool,

    /// Print a summary after the per-file diagnostics
    #[arg(long, value_enum)]
    pub report: Option<ReportFormat>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "artists-figure")]
#[command(about = "Render the artists illustration figure as a PDF")]
pub struct FigureArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the output file from config
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl LogFormat {
    pub fn init(self, verbose: bool) {
        match self {
            LogFormat::Compact => crate::utils::logger::init_cli_logger(verbose),
            LogFormat::Json => crate::utils::logger::init_json_logger(),
        }
    }
}
