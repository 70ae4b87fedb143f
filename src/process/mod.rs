//! External command execution

pub mod runner;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use runner::ProcessRunner;

/// One external process invocation: an ordered, immutable argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The program to launch, if any arguments were supplied
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Arguments after the program
    pub fn arguments(&self) -> &[String] {
        if self.args.is_empty() {
            &[]
        } else {
            &self.args[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Exit status and captured combined output of one completed invocation
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Numeric exit code (-1 when the process was killed by a signal)
    pub exit_code: i32,

    /// Full combined stdout + stderr text
    pub output: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Error types for command execution
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Trait for launching external commands - allows for different implementations
///
/// `run` resolves only once the process has exited; there is no overlapping
/// execution, no timeout and no retry. An empty command returns `None`
/// (a no-op by design, not an error).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &ExternalCommand,
    ) -> Result<Option<CommandOutcome>, RunnerError>;
}
