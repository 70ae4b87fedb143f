//! Process runner - spawns external tools and captures their output

use crate::process::{CommandOutcome, CommandRunner, ExternalCommand, RunnerError};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Launches external commands as OS processes
///
/// Standard error is captured into the same combined transcript as standard
/// output, so callers always see one output text per invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &ExternalCommand,
    ) -> Result<Option<CommandOutcome>, RunnerError> {
        let Some(program) = command.program() else {
            return Ok(None);
        };

        debug!("Spawning `{}`", command);

        let output = Command::new(program)
            .args(command.arguments())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RunnerError::Spawn {
                command: command.to_string(),
                source: e,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if exit_code != 0 {
            warn!("`{}` exited with code {}", command, exit_code);
        } else {
            debug!("`{}` returned {} bytes of output", command, combined.len());
        }

        Ok(Some(CommandOutcome {
            exit_code,
            output: combined,
        }))
    }
}
