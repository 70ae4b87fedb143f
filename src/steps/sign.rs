//! Signer - invokes apksigner over the final archive

use crate::process::{CommandRunner, ExternalCommand};
use crate::steps::{display_path, run_tool, StepError};
use std::path::Path;
use tracing::info;

/// Sign the archive in place with the platform key/certificate pair.
///
/// The tool produces a `.idsig` sidecar next to the archive. A non-zero exit
/// is an error; signing is the one tool outcome that aborts the pipeline.
pub async fn sign<R: CommandRunner + ?Sized>(
    runner: &R,
    apksigner: &Path,
    certs_dir: &Path,
    min_sdk: u32,
    archive: &Path,
) -> Result<(), StepError> {
    info!("Signing {}", display_path(archive));

    let command = ExternalCommand::new([
        display_path(apksigner),
        "sign".to_string(),
        "--min-sdk-version".to_string(),
        min_sdk.to_string(),
        "--key".to_string(),
        display_path(&certs_dir.join("platform.pk8")),
        "--cert".to_string(),
        display_path(&certs_dir.join("platform.x509.pem")),
        "--in".to_string(),
        display_path(archive),
    ]);

    let outcome = run_tool(runner, &command).await?;
    if !outcome.success() {
        return Err(StepError::ToolFailed {
            tool: "apksigner",
            code: outcome.exit_code,
            output: outcome.output,
        });
    }

    Ok(())
}
