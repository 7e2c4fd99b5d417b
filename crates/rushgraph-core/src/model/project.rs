use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One `projects[]` entry of `rush.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub package_name: String,
    pub project_folder: String,
    #[serde(default)]
    pub should_publish: Option<bool>,
}

/// A package managed directly inside the monorepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub package_name: String,
    /// Folder relative to the repository root, `/`-separated.
    pub folder: String,
    pub should_publish: bool,
    /// Absolute (or root-joined) directory holding the project's `package.json`.
    pub dir: PathBuf,
}

impl Project {
    #[must_use]
    pub fn new(repo_root: &Path, entry: ProjectEntry) -> Self {
        let dir = entry
            .project_folder
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(repo_root.to_path_buf(), |dir, segment| dir.join(segment));
        Self {
            package_name: entry.package_name,
            folder: entry.project_folder,
            should_publish: entry.should_publish.unwrap_or(false),
            dir,
        }
    }

    /// Canonical lockfile key of the pseudo-package the workspace manager
    /// generates for this project, e.g. `file:projects/pkg-a.tgz`.
    ///
    /// The tarball is named after the second folder segment
    /// (`projects/pkg-a` → `pkg-a`), or the only segment for flat folders.
    #[must_use]
    pub fn lockfile_key(&self, prefix: &str) -> String {
        let mut segments = self.folder.split('/').filter(|s| !s.is_empty());
        let first = segments.next().unwrap_or_default();
        let tarball = segments.next().unwrap_or(first);
        format!("{prefix}{tarball}.tgz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(folder: &str) -> Project {
        Project::new(
            Path::new("/repo"),
            ProjectEntry {
                package_name: "@scope/pkg".into(),
                project_folder: folder.into(),
                should_publish: None,
            },
        )
    }

    #[test]
    fn lockfile_key_uses_second_folder_segment() {
        assert_eq!(
            project("projects/pkg-a").lockfile_key("file:projects/"),
            "file:projects/pkg-a.tgz"
        );
        assert_eq!(
            project("apps/web/extra").lockfile_key("file:projects/"),
            "file:projects/web.tgz"
        );
        assert_eq!(
            project("tool").lockfile_key("file:projects/"),
            "file:projects/tool.tgz"
        );
    }

    #[test]
    fn dir_joins_folder_segments_and_publish_defaults_off() {
        let p = project("projects/pkg-a");
        assert_eq!(p.dir, PathBuf::from("/repo/projects/pkg-a"));
        assert!(!p.should_publish);
    }
}
