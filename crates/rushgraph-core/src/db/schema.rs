//! Relational store schema.
//!
//! - `node` holds one row per distinct `(value, is_label)` pair keyed by
//!   its surrogate id
//! - `edge` holds one row per statement; `type` is the raw predicate value

pub const SCHEMA_SQL: &str = r"
CREATE TABLE node (
    id INTEGER PRIMARY KEY,
    value TEXT NOT NULL,
    is_label INTEGER NOT NULL CHECK (is_label IN (0, 1))
);

CREATE TABLE edge (
    from_id INTEGER NOT NULL,
    to_id INTEGER NOT NULL,
    type TEXT NOT NULL
);

CREATE INDEX idx_node_value ON node(value);
CREATE INDEX idx_edge_from ON edge(from_id);
CREATE INDEX idx_edge_to ON edge(to_id);
CREATE INDEX idx_edge_type ON edge(type);
";

pub const INSERT_NODE_SQL: &str = "INSERT INTO node (id, value, is_label) VALUES (?1, ?2, ?3)";

pub const INSERT_EDGE_SQL: &str = "INSERT INTO edge (from_id, to_id, type) VALUES (?1, ?2, ?3)";
