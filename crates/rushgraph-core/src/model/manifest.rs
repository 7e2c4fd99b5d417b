//! Parsed `package.json` descriptor for one package at one version.
//!
//! Third-party manifests are read leniently: a field with an unexpected shape
//! is treated as absent instead of failing the whole manifest.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::dependency::DependencyType;

/// Literal emitted when a manifest carries no usable license.
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerMeta {
    /// Set only by a literal `"optional": true`.
    pub optional: bool,
}

/// `repository` accepts either a bare URL or `{ "type": ..., "url": ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    Url(String),
    Descriptor { url: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_ranges")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_ranges")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_ranges")]
    pub peer_dependencies: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient_peer_meta")]
    pub peer_dependencies_meta: BTreeMap<String, PeerMeta>,
    /// Raw license value; only string licenses are meaningful.
    #[serde(default)]
    pub license: Option<Value>,
    #[serde(default, deserialize_with = "lenient_description")]
    pub description: Option<String>,
    /// Raw author value, string or `{ "name": ... }`. Not part of the graph.
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default, deserialize_with = "lenient_repository")]
    pub repository: Option<Repository>,
    #[serde(default, deserialize_with = "lenient_keywords")]
    pub keywords: Vec<String>,
    /// File the manifest was read from, for diagnostics.
    #[serde(skip)]
    pub path: PathBuf,
}

impl Manifest {
    /// `name/version` identity of this manifest.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// Classify how this manifest declares `dep`.
    ///
    /// Sections are checked in order prod, dev, peer, then optional-peer
    /// metadata, so a name declared in several sections takes the first.
    /// Returns `None` when no section mentions it.
    #[must_use]
    pub fn classify(&self, dep: &str) -> Option<DependencyType> {
        if self.dependencies.contains_key(dep) {
            Some(DependencyType::Prod)
        } else if self.dev_dependencies.contains_key(dep) {
            Some(DependencyType::Dev)
        } else if self.peer_dependencies.contains_key(dep) {
            Some(DependencyType::Peer)
        } else if self.peer_dependencies_meta.get(dep).is_some_and(|meta| meta.optional) {
            Some(DependencyType::OptPeer)
        } else {
            None
        }
    }

    /// License label safe for use as a single token.
    ///
    /// `None` when the manifest has no `license` field at all. Structured or
    /// blank licenses yield [`UNKNOWN_LICENSE`]; multi-word expressions have
    /// their whitespace runs joined with `-`.
    #[must_use]
    pub fn license_label(&self) -> Option<String> {
        let value = self.license.as_ref()?;
        let label = value
            .as_str()
            .map(|raw| raw.split_whitespace().collect::<Vec<_>>().join("-"))
            .filter(|normalized| !normalized.is_empty())
            .unwrap_or_else(|| UNKNOWN_LICENSE.to_string());
        Some(label)
    }

    #[must_use]
    pub fn repository_url(&self) -> Option<&str> {
        let url = match self.repository.as_ref()? {
            Repository::Url(url) => Some(url.as_str()),
            Repository::Descriptor { url } => url.as_deref(),
        };
        url.filter(|url| !url.trim().is_empty())
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        _ => String::new(),
    })
}

fn lenient_description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Name → range sections. A non-string range is kept as its JSON text so the
/// name still classifies.
fn lenient_ranges<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Object(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .map(|(name, range)| match range {
            Value::String(range) => (name, range),
            other => (name, other.to_string()),
        })
        .collect())
}

fn lenient_peer_meta<'de, D>(deserializer: D) -> Result<BTreeMap<String, PeerMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Object(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .map(|(name, meta)| {
            let optional = matches!(meta.get("optional"), Some(Value::Bool(true)));
            (name, PeerMeta { optional })
        })
        .collect())
}

fn lenient_repository<'de, D>(deserializer: D) -> Result<Option<Repository>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(url)) => Some(Repository::Url(url)),
        Some(Value::Object(fields)) => Some(Repository::Descriptor {
            url: fields.get("url").and_then(Value::as_str).map(str::to_string),
        }),
        _ => None,
    })
}

/// Some published manifests carry a single string, or non-string entries,
/// under `keywords`. Keep whatever strings are there.
fn lenient_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let keywords = match value {
        Some(Value::String(keyword)) => vec![keyword],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(keyword) => Some(keyword),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(keywords)
}
