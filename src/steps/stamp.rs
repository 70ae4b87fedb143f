//! Version stamp - writes the version.txt metadata file

use crate::steps::{display_path, StepError};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tracing::info;

/// Render the stamp contents for a given build time
fn contents(version: i32, plugin_name: &str, buildtime: DateTime<Local>) -> String {
    format!(
        "Version: {}\nBuildtime: {}\nPluginName: {}\n",
        version,
        buildtime.format("%d-%m-%Y %H:%M:%S"),
        plugin_name
    )
}

/// Write the version stamp file: version, build time, plugin name
pub fn write_version_file(
    path: &Path,
    version: i32,
    plugin_name: &str,
) -> Result<(), StepError> {
    info!("Generating version file");
    fs::write(path, contents(version, plugin_name, Local::now()))
        .map_err(|e| StepError::io(format!("writing {}", display_path(path)), e))
}
