//! Pipeline configuration from YAML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the plugin; the final archive is `<plugin_name>.jar`
    pub plugin_name: String,

    /// Plugin version number, stamped into version.txt
    pub version: i32,

    /// Application package id on the target device
    pub package: String,

    /// Directory where all artifacts are produced
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Directory of compiled classes to package
    pub classes_dir: PathBuf,

    /// Directory containing the `d8` converter
    pub build_tools: PathBuf,

    /// Directory containing `apksigner` (defaults to `build_tools`)
    #[serde(default)]
    pub sign_tools: Option<PathBuf>,

    /// Certificate/key directory; presence enables the signing branch
    #[serde(default)]
    pub sign_certs: Option<PathBuf>,

    /// Target device id; with signing configured, enables the install branch
    #[serde(default)]
    pub device_id: Option<String>,

    /// Minimum SDK version passed to the signer
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_min_sdk() -> u32 {
    30
}

/// Signing branch, resolved once at pipeline assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signing {
    Disabled,
    Enabled {
        certs_dir: PathBuf,
        tools_dir: PathBuf,
    },
}

/// Install branch, resolved once at pipeline assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    None,
    Device(String),
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    ///
    /// A missing or empty `package` is a fatal configuration error; it is
    /// raised here, before any task is assembled.
    pub fn validate(&self) -> Result<()> {
        if self.package.trim().is_empty() {
            anyhow::bail!("Target package id must not be empty");
        }

        if self.plugin_name.trim().is_empty() {
            anyhow::bail!("Plugin name must not be empty");
        }

        if let Some(device_id) = &self.device_id {
            if !device_id.trim().is_empty() && self.sign_certs.is_none() {
                tracing::warn!(
                    "Device {} is configured but signing is not; installation will be skipped",
                    device_id
                );
            }
        }

        Ok(())
    }

    /// Resolve the signing branch
    pub fn signing(&self) -> Signing {
        match &self.sign_certs {
            Some(certs_dir) => Signing::Enabled {
                certs_dir: certs_dir.clone(),
                tools_dir: self
                    .sign_tools
                    .clone()
                    .unwrap_or_else(|| self.build_tools.clone()),
            },
            None => Signing::Disabled,
        }
    }

    /// Resolve the install branch
    ///
    /// Installation requires both a signing configuration and a non-empty
    /// device id.
    pub fn device_target(&self) -> DeviceTarget {
        match (&self.sign_certs, &self.device_id) {
            (Some(_), Some(id)) if !id.trim().is_empty() => {
                DeviceTarget::Device(id.clone())
            }
            _ => DeviceTarget::None,
        }
    }

    /// Path to the `d8` converter executable
    pub fn d8(&self) -> PathBuf {
        self.build_tools.join("d8")
    }
}
