use std::fmt;

/// Machine-readable error codes for the fatal conditions of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    WorkspaceManifestMissing,
    WorkspaceManifestInvalid,
    ConfigParseError,
    LockfileMissing,
    LockfileInvalid,
    PackageManifestInvalid,
    ProjectNotInLockfile,
    StatementParseError,
    OutputExists,
    StoreWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::WorkspaceManifestMissing => "E1001",
            Self::WorkspaceManifestInvalid => "E1002",
            Self::ConfigParseError => "E1003",
            Self::LockfileMissing => "E2001",
            Self::LockfileInvalid => "E2002",
            Self::PackageManifestInvalid => "E2003",
            Self::ProjectNotInLockfile => "E2004",
            Self::StatementParseError => "E3001",
            Self::OutputExists => "E5001",
            Self::StoreWriteFailed => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WorkspaceManifestMissing => "Workspace manifest not found",
            Self::WorkspaceManifestInvalid => "Workspace manifest parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::LockfileMissing => "Lockfile not found",
            Self::LockfileInvalid => "Lockfile parse error",
            Self::PackageManifestInvalid => "Package manifest parse error",
            Self::ProjectNotInLockfile => "Workspace project missing from lockfile",
            Self::StatementParseError => "Statement file parse error",
            Self::OutputExists => "Output file already exists",
            Self::StoreWriteFailed => "Relational store write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::WorkspaceManifestMissing => {
                Some("Pass the repository root that contains rush.json.")
            }
            Self::WorkspaceManifestInvalid => Some("Fix the syntax of rush.json and retry."),
            Self::ConfigParseError => Some("Fix syntax in .rushgraph.toml and retry."),
            Self::LockfileMissing => Some("Run `rush update` to generate the pnpm lockfile."),
            Self::LockfileInvalid => Some("Regenerate the lockfile with `rush update --full`."),
            Self::PackageManifestInvalid => None,
            Self::ProjectNotInLockfile => {
                Some("The lockfile is out of date with rush.json; run `rush update`.")
            }
            Self::StatementParseError => {
                Some("Regenerate the statement file with `rushgraph graph`.")
            }
            Self::OutputExists => Some("Remove the file or choose another output path."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
