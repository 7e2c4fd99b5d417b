//! pnpm lockfile records and workspace-project alias resolution.

pub mod index;
pub mod key;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

pub use index::{LockfileError, LockfileIndex};
pub use key::{PackageKey, parse_package_key};

/// The parts of `pnpm-lock.yaml` the graph needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub packages: BTreeMap<String, LockEntry>,
}

impl Lockfile {
    /// Parse lockfile YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document is not a valid lockfile.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// One `packages` record, keyed by an opaque key string in [`Lockfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LockEntry {
    /// Canonical key of an aliased workspace-project entry.
    #[serde(default)]
    pub id: Option<String>,
    /// Dependency name → resolved version.
    #[serde(default, deserialize_with = "scalar_map")]
    pub dependencies: Option<BTreeMap<String, String>>,
}

/// YAML may type an unquoted resolved version as a number; keep every
/// scalar as its text.
fn scalar_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .filter_map(|(name, value)| {
                let version = match value {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((name, version))
            })
            .collect()
    }))
}
