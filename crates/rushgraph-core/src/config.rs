use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::LoadError;

/// Name of the optional per-repository config file.
pub const CONFIG_FILE_NAME: &str = ".rushgraph.toml";

/// Namespace that relative statement IRIs are resolved against and that the
/// relational projection strips back off.
pub const DEFAULT_NAMESPACE: &str = "/prefix/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub lockfile: LockfileConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the workspace manager and package manager keep their files,
/// relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_workspace_manifest")]
    pub workspace_manifest: PathBuf,
    #[serde(default = "default_lockfile")]
    pub lockfile: PathBuf,
    #[serde(default = "default_package_store")]
    pub package_store: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            workspace_manifest: default_workspace_manifest(),
            lockfile: default_lockfile(),
            package_store: default_package_store(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockfileConfig {
    #[serde(default = "default_project_key_prefix")]
    pub project_key_prefix: String,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        Self {
            project_key_prefix: default_project_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub emit_descriptions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_output_file_name(),
            emit_descriptions: false,
        }
    }
}

/// Load `.rushgraph.toml` from the repository root, falling back to defaults
/// when the file does not exist.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file exists but cannot be read and
/// [`LoadError::Config`] if it is not valid TOML for [`GraphConfig`].
pub fn load_config(repo_root: &Path) -> Result<GraphConfig, LoadError> {
    let path = repo_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(GraphConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;

    toml::from_str::<GraphConfig>(&content).map_err(|source| LoadError::Config { path, source })
}

fn default_workspace_manifest() -> PathBuf {
    PathBuf::from("rush.json")
}

fn default_lockfile() -> PathBuf {
    ["common", "config", "rush", "pnpm-lock.yaml"].iter().collect()
}

fn default_package_store() -> PathBuf {
    ["common", "temp", "node_modules", ".pnpm"].iter().collect()
}

fn default_project_key_prefix() -> String {
    "file:projects/".to_string()
}

fn default_output_file_name() -> String {
    "deps.nq".to_string()
}
