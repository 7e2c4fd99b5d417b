//! Lookup of workspace-project entries in the lockfile.
//!
//! The package manager may key a workspace project's pseudo-entry with a
//! peer-resolution suffix: instead of `file:projects/pkg-a.tgz` the entry is
//! stored as `file:projects/pkg-a.tgz_react@16.14.0` and carries the
//! canonical key in its `id` field. [`LockfileIndex`] builds, in one pass,
//! an alias map from every canonical project key to the key actually used.

use std::collections::BTreeMap;

use tracing::debug;

use super::{LockEntry, Lockfile};
use crate::error::ErrorCode;
use crate::model::Project;

/// Alias resolution failures. Fatal: the workspace manifest and the
/// lockfile have diverged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockfileError {
    #[error("project '{project}' has no lockfile entry (expected key '{key}')")]
    ProjectNotFound { project: String, key: String },
}

impl LockfileError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ProjectNotFound { .. } => ErrorCode::ProjectNotInLockfile,
        }
    }
}

/// A lockfile plus the canonical→actual key map for workspace projects.
#[derive(Debug, Clone)]
pub struct LockfileIndex {
    lockfile: Lockfile,
    prefix: String,
    aliases: BTreeMap<String, String>,
}

impl LockfileIndex {
    /// Index `lockfile`, treating keys that start with `prefix` as
    /// workspace-project pseudo-entries.
    #[must_use]
    pub fn new(lockfile: Lockfile, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let mut aliases = BTreeMap::new();

        for (key, entry) in &lockfile.packages {
            if !key.starts_with(&prefix) {
                continue;
            }
            match entry.id.as_deref() {
                Some(id) if id.starts_with(&prefix) => {
                    debug!(canonical = id, actual = %key, "aliased project lockfile entry");
                    aliases.insert(id.to_string(), key.clone());
                }
                _ => {
                    aliases.insert(key.clone(), key.clone());
                }
            }
        }

        Self {
            lockfile,
            prefix,
            aliases,
        }
    }

    /// `true` for workspace-project pseudo-keys, which never denote an
    /// installable package version.
    #[must_use]
    pub fn is_project_key(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Lockfile entries that are not workspace-project pseudo-entries.
    pub fn package_entries(&self) -> impl Iterator<Item = (&str, &LockEntry)> {
        self.lockfile
            .packages
            .iter()
            .filter(|(key, _)| !self.is_project_key(key))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Find the lockfile entry of a workspace project.
    ///
    /// # Errors
    ///
    /// Returns [`LockfileError::ProjectNotFound`] when neither the canonical
    /// key nor an alias of it is present.
    pub fn resolve(&self, project: &Project) -> Result<&LockEntry, LockfileError> {
        let canonical = project.lockfile_key(&self.prefix);
        self.aliases
            .get(&canonical)
            .and_then(|actual| self.lockfile.packages.get(actual))
            .ok_or_else(|| LockfileError::ProjectNotFound {
                project: project.package_name.clone(),
                key: canonical,
            })
    }
}
