//! Package keys of the pnpm lockfile.
//!
//! Keys are slash-delimited paths with a leading separator whose last
//! segment is the resolved version (possibly carrying a peer suffix):
//!
//! ```text
//! /wrap-ansi/6.2.0
//! /@storybook/components/5.3.21_@types+react@16.9.49
//! ```
//!
//! Everything between the leading separator and the last separator is the
//! package name, which keeps scoped names (`@scope/name`) intact.

/// A lockfile key split into package name and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageKey<'a> {
    pub name: &'a str,
    pub version: &'a str,
}

impl PackageKey<'_> {
    /// `name/version` identity, i.e. the key without its leading separator.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Split a lockfile key into `(name, version)`.
///
/// Returns `None` for keys that have no separator after the leading one or
/// an empty name or version.
#[must_use]
pub fn parse_package_key(key: &str) -> Option<PackageKey<'_>> {
    let path = key.strip_prefix('/').unwrap_or(key);
    let (name, version) = path.rsplit_once('/')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some(PackageKey { name, version })
}
