//! Read-only records loaded from the workspace: projects, package manifests
//! and dependency classifications.

pub mod dependency;
pub mod manifest;
pub mod project;

pub use dependency::DependencyType;
pub use manifest::Manifest;
pub use project::{Project, ProjectEntry};
