use std::fmt;

/// How a package depends on another.
///
/// [`DependencyType::Unknown`] marks an edge whose declaring manifest has no
/// section naming the dependency. It is kept distinct so that such edges
/// stay visible instead of being folded into one of the declared kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyType {
    Prod,
    Dev,
    Peer,
    OptPeer,
    Unknown,
}

impl DependencyType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Dev => "dev",
            Self::Peer => "peer",
            Self::OptPeer => "opt_peer",
            Self::Unknown => "unknown",
        }
    }

    /// Predicate name used for edges of this type, e.g. `depends_prod`.
    #[must_use]
    pub fn predicate(self) -> String {
        format!("depends_{}", self.as_str())
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DependencyType;

    #[test]
    fn predicates_are_prefixed_type_names() {
        assert_eq!(DependencyType::Prod.predicate(), "depends_prod");
        assert_eq!(DependencyType::OptPeer.predicate(), "depends_opt_peer");
        assert_eq!(DependencyType::Unknown.predicate(), "depends_unknown");
    }
}
