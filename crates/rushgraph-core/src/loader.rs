//! Reading the workspace manifest, package manifests and the lockfile.
//!
//! Installed third-party packages live in the package manager's virtual
//! store. A version listed in the lockfile that has no manifest in the
//! store was skipped at install time (an optional dependency for another
//! platform, typically); [`ManifestLoader::lookup_version`] reports that as
//! [`ManifestLookup::NotInstalled`] instead of failing.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::{GraphConfig, LayoutConfig};
use crate::error::ErrorCode;
use crate::lockfile::Lockfile;
use crate::model::{Manifest, Project, ProjectEntry};

const PACKAGE_MANIFEST: &str = "package.json";

/// Errors raised while reading workspace inputs. All of them abort the run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("workspace manifest not found at {}", path.display())]
    WorkspaceManifestMissing { path: PathBuf },

    #[error("failed to parse workspace manifest {}", path.display())]
    WorkspaceManifest {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    #[error("lockfile not found at {}", path.display())]
    LockfileMissing { path: PathBuf },

    #[error("failed to parse lockfile {}", path.display())]
    Lockfile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("package manifest not found at {}", path.display())]
    PackageManifestMissing { path: PathBuf },

    #[error("failed to parse package manifest {}", path.display())]
    PackageManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::WorkspaceManifestMissing { .. } => ErrorCode::WorkspaceManifestMissing,
            Self::WorkspaceManifest { .. } => ErrorCode::WorkspaceManifestInvalid,
            Self::LockfileMissing { .. } => ErrorCode::LockfileMissing,
            Self::Lockfile { .. } => ErrorCode::LockfileInvalid,
            Self::PackageManifestMissing { .. } | Self::PackageManifest { .. } => {
                ErrorCode::PackageManifestInvalid
            }
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::Io { .. } => ErrorCode::InternalUnexpected,
        }
    }
}

/// Outcome of looking for a package version's manifest on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestLookup {
    Found(Manifest),
    /// Nothing at the expected location: the version was not installed.
    NotInstalled { expected: PathBuf },
}

#[derive(Debug, Deserialize)]
struct WorkspaceManifest {
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

/// Reads workspace inputs relative to a repository root.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    repo_root: PathBuf,
    layout: LayoutConfig,
}

impl ManifestLoader {
    #[must_use]
    pub fn new(repo_root: &Path, config: &GraphConfig) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            layout: config.layout.clone(),
        }
    }

    /// Load the project list from the workspace manifest (JSON with comments).
    ///
    /// # Errors
    ///
    /// Fails if the workspace manifest is missing, unreadable or unparseable.
    pub fn load_projects(&self) -> Result<Vec<Project>, LoadError> {
        let path = self.repo_root.join(&self.layout.workspace_manifest);
        if !path.is_file() {
            return Err(LoadError::WorkspaceManifestMissing { path });
        }

        let content = read_to_string(&path)?;
        let manifest: WorkspaceManifest = json5::from_str(&content)
            .map_err(|source| LoadError::WorkspaceManifest { path, source })?;

        Ok(manifest
            .projects
            .into_iter()
            .map(|entry| Project::new(&self.repo_root, entry))
            .collect())
    }

    /// Load and parse the lockfile.
    ///
    /// # Errors
    ///
    /// Fails if the lockfile is missing, unreadable or unparseable.
    pub fn load_lockfile(&self) -> Result<Lockfile, LoadError> {
        let path = self.repo_root.join(&self.layout.lockfile);
        if !path.is_file() {
            return Err(LoadError::LockfileMissing { path });
        }

        let content = read_to_string(&path)?;
        Lockfile::from_yaml(&content).map_err(|source| LoadError::Lockfile { path, source })
    }

    /// Read the manifest of a workspace project, which must exist.
    ///
    /// # Errors
    ///
    /// Fails if the project's `package.json` is missing or unparseable.
    pub fn read_project_manifest(project: &Project) -> Result<Manifest, LoadError> {
        match lookup_manifest(&project.dir)? {
            ManifestLookup::Found(manifest) => Ok(manifest),
            ManifestLookup::NotInstalled { expected } => {
                Err(LoadError::PackageManifestMissing { path: expected })
            }
        }
    }

    /// Look for the manifest of `name` at `version`.
    ///
    /// Workspace projects are read from their own folder whatever the
    /// version; other packages from the virtual store.
    ///
    /// # Errors
    ///
    /// Fails only if a manifest exists but cannot be read or parsed.
    pub fn lookup_version(
        &self,
        name: &str,
        version: &str,
        project: Option<&Project>,
    ) -> Result<ManifestLookup, LoadError> {
        if let Some(project) = project {
            return lookup_manifest(&project.dir);
        }

        let candidates = self.store_dirs(name, version);
        for dir in &candidates {
            if dir.join(PACKAGE_MANIFEST).is_file() {
                return lookup_manifest(dir);
            }
        }

        let expected = candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| self.store_root())
            .join(PACKAGE_MANIFEST);
        Ok(ManifestLookup::NotInstalled { expected })
    }

    fn store_root(&self) -> PathBuf {
        self.repo_root.join(&self.layout.package_store)
    }

    /// Candidate install directories of a package version in the store.
    ///
    /// Unscoped: `<store>/name@ver/node_modules/name`.
    /// Scoped: `<store>/@scope/name@ver/node_modules/@scope/name`, then the
    /// flattened `<store>/@scope+name@ver/node_modules/@scope/name`.
    #[must_use]
    pub fn store_dirs(&self, name: &str, version: &str) -> Vec<PathBuf> {
        let store = self.store_root();
        match name.split_once('/') {
            Some((scope, bare)) => vec![
                store
                    .join(scope)
                    .join(format!("{bare}@{version}"))
                    .join("node_modules")
                    .join(scope)
                    .join(bare),
                store
                    .join(format!("{scope}+{bare}@{version}"))
                    .join("node_modules")
                    .join(scope)
                    .join(bare),
            ],
            None => vec![
                store
                    .join(format!("{name}@{version}"))
                    .join("node_modules")
                    .join(name),
            ],
        }
    }
}

/// Read `dir/package.json`, reporting absence as [`ManifestLookup::NotInstalled`].
///
/// # Errors
///
/// Fails if the file exists but cannot be read or is not valid JSON.
pub fn lookup_manifest(dir: &Path) -> Result<ManifestLookup, LoadError> {
    let path = dir.join(PACKAGE_MANIFEST);
    if !path.is_file() {
        return Ok(ManifestLookup::NotInstalled { expected: path });
    }

    let content = read_to_string(&path)?;
    let mut manifest: Manifest = serde_json::from_str(&content).map_err(|source| {
        LoadError::PackageManifest {
            path: path.clone(),
            source,
        }
    })?;
    debug!(manifest = %path.display(), id = %manifest.id(), "read package manifest");
    manifest.path = path;
    Ok(ManifestLookup::Found(manifest))
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        std::fs::write(path, content).expect("write file");
    }

    fn loader(dir: &TempDir) -> ManifestLoader {
        ManifestLoader::new(dir.path(), &GraphConfig::default())
    }

    #[test]
    fn loads_projects_from_commented_workspace_manifest() {
        let dir = TempDir::new().expect("tempdir");
        write(
            dir.path(),
            "rush.json",
            r#"/**
 * Rush main config
 */
{
  "rushVersion": "5.30.0",
  // the projects
  "projects": [
    { "packageName": "pkg-a", "projectFolder": "projects/pkg-a", "shouldPublish": true },
    { "packageName": "@acme/pkg-b", "projectFolder": "projects/pkg-b" },
  ]
}"#,
        );

        let projects = loader(&dir).load_projects().expect("projects load");
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].package_name, "pkg-a");
        assert!(projects[0].should_publish);
        assert_eq!(projects[1].package_name, "@acme/pkg-b");
        assert!(!projects[1].should_publish);
        assert_eq!(projects[1].dir, dir.path().join("projects").join("pkg-b"));
    }

    #[test]
    fn missing_workspace_manifest_and_lockfile_are_errors() {
        let dir = TempDir::new().expect("tempdir");
        let l = loader(&dir);
        assert!(matches!(
            l.load_projects(),
            Err(LoadError::WorkspaceManifestMissing { .. })
        ));
        let err = l.load_lockfile().expect_err("missing lockfile");
        assert_eq!(err.code(), ErrorCode::LockfileMissing);
    }

    #[test]
    fn unparseable_lockfile_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        write(
            dir.path(),
            "common/config/rush/pnpm-lock.yaml",
            "packages: [unclosed",
        );
        let err = loader(&dir).load_lockfile().expect_err("bad yaml");
        assert_eq!(err.code(), ErrorCode::LockfileInvalid);
    }

    #[test]
    fn lookup_finds_unscoped_and_scoped_store_layouts() {
        let dir = TempDir::new().expect("tempdir");
        write(
            dir.path(),
            "common/temp/node_modules/.pnpm/lodash@4.17.21/node_modules/lodash/package.json",
            r#"{"name": "lodash", "version": "4.17.21", "license": "MIT"}"#,
        );
        write(
            dir.path(),
            "common/temp/node_modules/.pnpm/@babel/core@7.12.3/node_modules/@babel/core/package.json",
            r#"{"name": "@babel/core", "version": "7.12.3"}"#,
        );
        write(
            dir.path(),
            "common/temp/node_modules/.pnpm/@types+node@14.0.0/node_modules/@types/node/package.json",
            r#"{"name": "@types/node", "version": "14.0.0"}"#,
        );

        let l = loader(&dir);
        for (name, version) in [
            ("lodash", "4.17.21"),
            ("@babel/core", "7.12.3"),
            ("@types/node", "14.0.0"),
        ] {
            match l.lookup_version(name, version, None).expect("lookup") {
                ManifestLookup::Found(m) => assert_eq!(m.name, name),
                ManifestLookup::NotInstalled { expected } => {
                    panic!("{name}@{version} not found, expected {}", expected.display())
                }
            }
        }
    }

    #[test]
    fn absent_version_is_not_installed() {
        let dir = TempDir::new().expect("tempdir");
        let lookup = loader(&dir)
            .lookup_version("fsevents", "2.1.3", None)
            .expect("lookup does not fail");
        let ManifestLookup::NotInstalled { expected } = lookup else {
            panic!("fsevents should not be installed");
        };
        assert!(expected.ends_with("fsevents@2.1.3/node_modules/fsevents/package.json"));
    }

    #[test]
    fn corrupt_manifest_is_an_error_not_a_skip() {
        let dir = TempDir::new().expect("tempdir");
        write(
            dir.path(),
            "common/temp/node_modules/.pnpm/bad@1.0.0/node_modules/bad/package.json",
            "{ not json",
        );
        let err = loader(&dir)
            .lookup_version("bad", "1.0.0", None)
            .expect_err("corrupt manifest");
        assert!(matches!(err, LoadError::PackageManifest { .. }));
    }
}
