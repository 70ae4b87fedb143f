//! Device-format converter - invokes d8 over the staging archive

use crate::process::{CommandOutcome, CommandRunner, ExternalCommand};
use crate::steps::{display_path, run_tool, StepError};
use std::path::Path;
use tracing::info;

/// Convert the staging archive to DEX format.
///
/// Launches `<d8> --no-desugaring --output <output_dir> <input_archive>` and
/// waits for it. The outcome is returned for the caller to check; the
/// converter itself does not validate the produced code.
pub async fn convert<R: CommandRunner + ?Sized>(
    runner: &R,
    d8: &Path,
    input_archive: &Path,
    output_dir: &Path,
) -> Result<CommandOutcome, StepError> {
    info!("Converting {} to DEX", display_path(input_archive));

    let command = ExternalCommand::new([
        display_path(d8),
        "--no-desugaring".to_string(),
        "--output".to_string(),
        display_path(output_dir),
        display_path(input_archive),
    ]);

    run_tool(runner, &command).await
}
