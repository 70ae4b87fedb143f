//! Pipeline build steps

pub mod archive;
pub mod clean;
pub mod convert;
pub mod install;
pub mod sign;
pub mod stamp;

use crate::process::{CommandOutcome, CommandRunner, ExternalCommand, RunnerError};
use std::path::Path;
use thiserror::Error;

/// Error types for step execution
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("{tool} exited with code {code}")]
    ToolFailed {
        tool: &'static str,
        code: i32,
        output: String,
    },
}

impl StepError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StepError::Io {
            context: context.into(),
            source,
        }
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Run a tool command and await its outcome.
///
/// An empty command never launches a process; it is reported as exit code -1
/// so callers treat it like a tool that could not run.
pub(crate) async fn run_tool<R: CommandRunner + ?Sized>(
    runner: &R,
    command: &ExternalCommand,
) -> Result<CommandOutcome, StepError> {
    match runner.run(command).await? {
        Some(outcome) => Ok(outcome),
        None => Ok(CommandOutcome {
            exit_code: -1,
            output: String::new(),
        }),
    }
}
