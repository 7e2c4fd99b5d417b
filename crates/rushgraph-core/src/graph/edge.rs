use crate::model::DependencyType;

/// Where an edge was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// A `dependencies` map of a lockfile entry.
    Lockfile,
    /// A workspace project's manifest naming another workspace project,
    /// which the lockfile never records.
    Workspace,
}

/// A dependency link from a package version to a target.
///
/// `source` is a `name/version` key for third-party packages and a bare
/// package name for workspace projects. `target` is `name/version`, or a
/// bare name for workspace-to-workspace edges. Targets are not guaranteed
/// to exist among the included nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: DependencyType,
    pub origin: EdgeOrigin,
}

impl Edge {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: DependencyType,
        origin: EdgeOrigin,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            origin,
        }
    }
}

/// Target key for a lockfile dependency entry.
///
/// An aliased dependency (`"my-alias": "/real-name/1.0.0"`) already holds a
/// full package key, which is used without its leading separator.
#[must_use]
pub fn dependency_target(dep: &str, resolved: &str) -> String {
    resolved
        .strip_prefix('/')
        .map_or_else(|| format!("{dep}/{resolved}"), str::to_string)
}
