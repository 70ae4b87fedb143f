//! Device installer - pushes the archive over adb and restarts the app

use crate::process::{CommandRunner, ExternalCommand};
use crate::steps::{display_path, run_tool, StepError};
use std::path::Path;
use tracing::{info, warn};

const ADB: &str = "adb";
const RESTART_ACTION: &str = "com.android.mqtt.RESTART";
const RESTART_RECEIVER: &str = ".core.MQTTReceiver";

/// How an install attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every command in the sequence succeeded
    Completed,
    /// The device never showed up in the listing; nothing was run
    DeviceNotConnected,
    /// A command failed; the rest of the sequence was abandoned
    Aborted { command: String, exit_code: i32 },
}

/// Check whether a device with the given id is connected.
///
/// Runs the device listing and looks for a line that, after trimming, starts
/// with the id. A listing that cannot be started, or any runner error,
/// degrades to `false` rather than propagating.
pub async fn is_device_connected<R: CommandRunner + ?Sized>(
    runner: &R,
    device_id: &str,
) -> bool {
    let command = ExternalCommand::new([ADB, "devices"]);

    match runner.run(&command).await {
        Ok(Some(outcome)) => outcome
            .output
            .lines()
            .any(|line| line.trim().starts_with(device_id)),
        Ok(None) => false,
        Err(e) => {
            warn!("Device listing failed: {}", e);
            false
        }
    }
}

/// Push the archive to the device and restart the embedded application.
///
/// The sequence is: become root, force-stop the app, push the archive into
/// the app's files directory, broadcast the restart intent. The first
/// non-zero exit abandons the remaining commands; nothing is retried.
pub async fn install<R: CommandRunner + ?Sized>(
    runner: &R,
    device_id: &str,
    archive: &Path,
    package: &str,
) -> Result<InstallOutcome, StepError> {
    if !is_device_connected(runner, device_id).await {
        warn!("Device {} is not connected; skipping installation", device_id);
        return Ok(InstallOutcome::DeviceNotConnected);
    }

    let archive = display_path(archive);
    let sequence = [
        ExternalCommand::new(vec![
            ADB.to_string(),
            "-s".to_string(),
            device_id.to_string(),
            "root".to_string(),
        ]),
        ExternalCommand::new(vec![
            ADB.to_string(),
            "-s".to_string(),
            device_id.to_string(),
            "shell".to_string(),
            "am".to_string(),
            "force-stop".to_string(),
            package.to_string(),
        ]),
        ExternalCommand::new(vec![
            ADB.to_string(),
            "-s".to_string(),
            device_id.to_string(),
            "push".to_string(),
            archive,
            format!("/data/data/{}/files/", package),
        ]),
        ExternalCommand::new(vec![
            ADB.to_string(),
            "-s".to_string(),
            device_id.to_string(),
            "shell".to_string(),
            "am".to_string(),
            "broadcast".to_string(),
            "-a".to_string(),
            RESTART_ACTION.to_string(),
            "-n".to_string(),
            format!("{}/{}", package, RESTART_RECEIVER),
        ]),
    ];

    for command in &sequence {
        let outcome = run_tool(runner, command).await?;
        if !outcome.success() {
            warn!(
                "`{}` exited with code {}; abandoning installation",
                command, outcome.exit_code
            );
            return Ok(InstallOutcome::Aborted {
                command: command.to_string(),
                exit_code: outcome.exit_code,
            });
        }
        info!("`{}` completed", command);
    }

    Ok(InstallOutcome::Completed)
}
