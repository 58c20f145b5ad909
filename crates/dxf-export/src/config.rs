//! `exportdxf.toml` handling.
//!
//! Every setting has a default, so the file and each of its sections are
//! optional. Command line flags take precedence over the file.

use std::path::Path;

use anyhow::{Context, Result};
use dxf_flat::FlipPolicy;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "exportdxf.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub flip: FlipConfig,
    pub bom: BomConfig,
    pub assembly: AssemblyConfig,
    pub export: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlipConfig {
    pub policy: FlipPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BomConfig {
    /// Rows hidden on the drawing are left out of the part list
    pub skip_hidden_rows: bool,
}

impl Default for BomConfig {
    fn default() -> Self {
        Self {
            skip_hidden_rows: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AssemblyConfig {
    pub top_level_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Prepended to every exported file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl ExportConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `exportdxf.toml` in `dir` is
    /// used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if !candidate.exists() {
                    log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
