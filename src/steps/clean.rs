//! Artifact cleaner - removes leftovers from a previous run

use crate::steps::{display_path, StepError};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Delete every path in `paths` that currently exists.
///
/// Non-existent paths are skipped silently; a deletion that fails at the OS
/// level is surfaced as a hard error, since later steps detect progress by
/// file presence. Returns the paths that were actually removed. Calling this
/// twice in a row is idempotent.
pub fn clean(paths: &[PathBuf]) -> Result<Vec<PathBuf>, StepError> {
    let mut removed = Vec::new();

    for path in paths {
        if !path.exists() {
            continue;
        }
        fs::remove_file(path)
            .map_err(|e| StepError::io(format!("removing {}", display_path(path)), e))?;
        info!("Removed {}", display_path(path));
        removed.push(path.clone());
    }

    Ok(removed)
}
