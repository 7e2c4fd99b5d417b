//! Statements → deduplicated node/edge tables.
//!
//! Every distinct `(value, kind)` pair becomes one node row with a surrogate
//! id; every statement becomes one edge row between the surrogate ids of its
//! subject and object. Ids are handed out from 1 in first-seen order, so the
//! same statement sequence always yields the same tables.
//!
//! The predicate is stored as its raw value on the edge and never interned.

use std::collections::HashMap;

use crate::nquads::{Statement, Term};

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A resource identifier, namespace stripped.
    Entity,
    /// A literal value.
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalNode {
    pub id: i64,
    pub value: String,
    pub kind: NodeKind,
}

impl RelationalNode {
    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self.kind, NodeKind::Label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalEdge {
    pub from_id: i64,
    pub to_id: i64,
    pub edge_type: String,
}

/// Output of one projection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationalTables {
    /// Ordered by surrogate id.
    pub nodes: Vec<RelationalNode>,
    /// Ordered as the statements were projected.
    pub edges: Vec<RelationalEdge>,
}

impl RelationalTables {
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_label()).count()
    }
}

// ---------------------------------------------------------------------------
// RelationalProjector
// ---------------------------------------------------------------------------

/// Owns the surrogate counter and dedup table for a single run.
#[derive(Debug)]
pub struct RelationalProjector {
    namespace: String,
    next_id: i64,
    ids: HashMap<(String, NodeKind), i64>,
    nodes: Vec<RelationalNode>,
    edges: Vec<RelationalEdge>,
}

impl RelationalProjector {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            next_id: 1,
            ids: HashMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Value and kind a term is stored under. Identifiers outside the
    /// namespace keep their full value.
    #[must_use]
    pub fn classify_term(&self, term: &Term) -> (String, NodeKind) {
        match term {
            Term::Iri(iri) => {
                let value = iri.strip_prefix(self.namespace.as_str()).unwrap_or(iri);
                (value.to_string(), NodeKind::Entity)
            }
            Term::Literal(text) => (text.clone(), NodeKind::Label),
        }
    }

    /// Surrogate id for `(value, kind)`, assigning the next one on first sight.
    pub fn intern_node(&mut self, value: String, kind: NodeKind) -> i64 {
        if let Some(&id) = self.ids.get(&(value.clone(), kind)) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push(RelationalNode {
            id,
            value: value.clone(),
            kind,
        });
        self.ids.insert((value, kind), id);
        id
    }

    pub fn project(&mut self, statement: &Statement) {
        let (subject, subject_kind) = self.classify_term(&statement.subject);
        let from_id = self.intern_node(subject, subject_kind);
        let (object, object_kind) = self.classify_term(&statement.object);
        let to_id = self.intern_node(object, object_kind);
        let (edge_type, _) = self.classify_term(&statement.predicate);
        self.edges.push(RelationalEdge {
            from_id,
            to_id,
            edge_type,
        });
    }

    pub fn project_all<'a, I>(&mut self, statements: I)
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        for statement in statements {
            self.project(statement);
        }
    }

    #[must_use]
    pub fn finish(self) -> RelationalTables {
        RelationalTables {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NS: &str = "/prefix/";

    fn link(s: &str, p: &str, o: &str) -> Statement {
        Statement::link(&format!("{NS}{s}"), &format!("{NS}{p}"), &format!("{NS}{o}"))
    }

    fn label(s: &str, p: &str, o: &str) -> Statement {
        Statement::label(&format!("{NS}{s}"), &format!("{NS}{p}"), o)
    }

    #[test]
    fn ids_start_at_one_in_first_seen_order() {
        let mut projector = RelationalProjector::new(NS);
        projector.project(&link("pkg-a", "depends_prod", "lodash/4.17.21"));
        projector.project(&link("lodash", "has_version", "lodash/4.17.21"));
        let tables = projector.finish();

        let values: Vec<(i64, &str)> = tables
            .nodes
            .iter()
            .map(|n| (n.id, n.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![(1, "pkg-a"), (2, "lodash/4.17.21"), (3, "lodash")]
        );
        assert_eq!(
            tables.edges,
            vec![
                RelationalEdge {
                    from_id: 1,
                    to_id: 2,
                    edge_type: "depends_prod".into()
                },
                RelationalEdge {
                    from_id: 3,
                    to_id: 2,
                    edge_type: "has_version".into()
                },
            ]
        );
    }

    #[test]
    fn same_value_as_entity_and_label_is_two_rows() {
        let mut projector = RelationalProjector::new(NS);
        projector.project(&label("lodash", "name", "lodash"));
        let tables = projector.finish();

        assert_eq!(tables.nodes.len(), 2);
        assert!(!tables.nodes[0].is_label());
        assert!(tables.nodes[1].is_label());
        assert_eq!(tables.nodes[0].value, tables.nodes[1].value);
        assert_eq!(tables.label_count(), 1);
    }

    #[test]
    fn identifiers_outside_namespace_are_kept_whole() {
        let projector = RelationalProjector::new(NS);
        let (value, kind) =
            projector.classify_term(&Term::iri("https://github.com/lodash/lodash.git"));
        assert_eq!(value, "https://github.com/lodash/lodash.git");
        assert_eq!(kind, NodeKind::Entity);
    }

    #[test]
    fn predicates_are_not_interned() {
        let mut projector = RelationalProjector::new(NS);
        projector.project(&link("a", "depends_dev", "b/1.0.0"));
        let tables = projector.finish();
        assert!(tables.nodes.iter().all(|n| n.value != "depends_dev"));
    }

    fn arb_statement() -> impl Strategy<Value = Statement> {
        let value = "[a-c]{1,2}";
        (value, prop_oneof![Just("name"), Just("has_version")], value, any::<bool>()).prop_map(
            |(s, p, o, is_label)| {
                if is_label {
                    label(&s, p, &o)
                } else {
                    link(&s, p, &o)
                }
            },
        )
    }

    proptest! {
        #[test]
        fn one_row_per_distinct_pair_and_stable_across_runs(
            statements in prop::collection::vec(arb_statement(), 0..40)
        ) {
            let run = || {
                let mut projector = RelationalProjector::new(NS);
                projector.project_all(&statements);
                projector.finish()
            };
            let first = run();
            prop_assert_eq!(&first, &run());
            prop_assert_eq!(first.edges.len(), statements.len());

            let mut seen = std::collections::HashSet::new();
            for (idx, node) in first.nodes.iter().enumerate() {
                prop_assert_eq!(node.id, i64::try_from(idx).expect("index fits") + 1);
                prop_assert!(seen.insert((node.value.clone(), node.kind)));
            }
        }
    }
}
