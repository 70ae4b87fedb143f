//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CleanCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Build pipeline for packaging, signing and deploying plugin jars
#[derive(Debug, Parser, Clone)]
#[command(name = "dexploy")]
#[command(version = "0.1.0")]
#[command(about = "Packages, dexes, signs and deploys Android plugin jars", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the build pipeline
    Run(RunCommand),

    /// Validate a pipeline configuration and show the resolved plan
    Validate(ValidateCommand),

    /// Remove artifacts left over from a previous run
    Clean(CleanCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
