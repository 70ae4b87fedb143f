//! CLI command definitions

use clap::Args;

/// Run the build pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Override the configured device id
    #[arg(long)]
    pub device: Option<String>,
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output the parsed configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Remove artifacts left over from a previous run
#[derive(Debug, Args, Clone)]
pub struct CleanCommand {
    /// Path to the pipeline YAML file
    #[arg(short, long)]
    pub file: String,
}
