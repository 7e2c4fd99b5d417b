use std::collections::BTreeMap;

use crate::model::{DependencyType, Manifest, Project};

/// One package of the dependency graph, keyed by package name.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    pub name: String,
    /// The workspace project that owns this package, if any.
    pub project: Option<Project>,
    /// Resolved version → manifest, for versions located on disk only.
    pub versions: BTreeMap<String, Manifest>,
}

/// Result of classifying a dependency against a node's manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Declared(DependencyType),
    /// The manifest exists but no section names the dependency.
    Undeclared,
    /// The node has no manifest for the requested version.
    NoManifest,
}

impl Classification {
    /// Dependency type to put on the edge; failures become
    /// [`DependencyType::Unknown`].
    #[must_use]
    pub const fn dependency_type(self) -> DependencyType {
        match self {
            Self::Declared(kind) => kind,
            Self::Undeclared | Self::NoManifest => DependencyType::Unknown,
        }
    }
}

impl PackageNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: None,
            versions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn for_project(project: Project) -> Self {
        Self {
            name: project.package_name.clone(),
            project: Some(project),
            versions: BTreeMap::new(),
        }
    }

    /// Record a resolved version. Returns `false` (and keeps the first
    /// manifest) if the version was already present.
    pub fn add_version(&mut self, version: impl Into<String>, manifest: Manifest) -> bool {
        let version = version.into();
        if self.versions.contains_key(&version) {
            return false;
        }
        self.versions.insert(version, manifest);
        true
    }

    #[must_use]
    pub fn has_version(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    /// Workspace packages are always part of the output; everything else
    /// only when at least one version is installed.
    #[must_use]
    pub fn should_include(&self) -> bool {
        !self.versions.is_empty() || self.project.is_some()
    }

    #[must_use]
    pub fn classify(&self, version: &str, dep: &str) -> Classification {
        match self.versions.get(version) {
            None => Classification::NoManifest,
            Some(manifest) => manifest
                .classify(dep)
                .map_or(Classification::Undeclared, Classification::Declared),
        }
    }
}
