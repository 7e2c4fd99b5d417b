//! SQLite relational store.
//!
//! A store is always a fresh file: [`Store::create`] refuses to touch a path
//! that already exists. Rows are written in one transaction; dropping a
//! [`Store`] without [`Store::write`] succeeding leaves no partial rows.

pub mod export;
pub mod schema;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tracing::{debug, warn};

pub use export::{ExportReport, create_sqlite_db};

use crate::error::ErrorCode;
use crate::relational::RelationalTables;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("output file {} already exists", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("failed to create {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sqlite error")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyExists { .. } => ErrorCode::OutputExists,
            Self::Create { .. } | Self::Sqlite(_) => ErrorCode::StoreWriteFailed,
        }
    }
}

/// Open connection to a newly created store file.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Create `path` exclusively and apply the schema.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] if anything is already at `path`;
    /// otherwise I/O or SQLite errors from creating the file. A file created
    /// before the schema failed to apply is removed again.
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        Self::create_with_schema(path, schema::SCHEMA_SQL)
    }

    fn create_with_schema(path: &Path, schema_sql: &str) -> Result<Self, StoreError> {
        ensure_absent(path)?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| {
                if source.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists {
                        path: path.to_path_buf(),
                    }
                } else {
                    StoreError::Create {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;

        let opened = Connection::open(path)
            .and_then(|conn| conn.execute_batch(schema_sql).map(|()| conn));
        match opened {
            Ok(conn) => {
                debug!(path = %path.display(), "created relational store");
                Ok(Self { conn })
            }
            Err(err) => {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %remove_err, "could not remove new store");
                }
                Err(StoreError::Sqlite(err))
            }
        }
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert all rows in one transaction. On error the transaction is
    /// rolled back when it goes out of scope.
    ///
    /// # Errors
    ///
    /// Returns the first SQLite error.
    pub fn write(&mut self, tables: &RelationalTables) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_node = tx.prepare(schema::INSERT_NODE_SQL)?;
            for node in &tables.nodes {
                insert_node.execute(params![node.id, node.value, i64::from(node.is_label())])?;
            }
            let mut insert_edge = tx.prepare(schema::INSERT_EDGE_SQL)?;
            for edge in &tables.edges {
                insert_edge.execute(params![edge.from_id, edge.to_id, edge.edge_type])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    ///
    /// # Errors
    ///
    /// Returns the SQLite close error.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))
    }
}

/// Fail with [`StoreError::AlreadyExists`] if `path` exists.
///
/// # Errors
///
/// See above.
pub fn ensure_absent(path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        return Err(StoreError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relational::{NodeKind, RelationalEdge, RelationalNode};
    use tempfile::TempDir;

    fn tables() -> RelationalTables {
        RelationalTables {
            nodes: vec![
                RelationalNode {
                    id: 1,
                    value: "pkg-a".into(),
                    kind: NodeKind::Entity,
                },
                RelationalNode {
                    id: 2,
                    value: "pkg-a".into(),
                    kind: NodeKind::Label,
                },
            ],
            edges: vec![RelationalEdge {
                from_id: 1,
                to_id: 2,
                edge_type: "name".into(),
            }],
        }
    }

    #[test]
    fn writes_rows_and_indexes() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("deps.db");
        let mut store = Store::create(&path).expect("create");
        store.write(&tables()).expect("write");

        let conn = store.connection();
        let rows: Vec<(i64, String, i64)> = conn
            .prepare("SELECT id, value, is_label FROM node ORDER BY id")
            .expect("prepare")
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .expect("query")
            .collect::<Result<_, _>>()
            .expect("rows");
        assert_eq!(rows, vec![(1, "pkg-a".into(), 0), (2, "pkg-a".into(), 1)]);

        let edge_type: String = conn
            .query_row("SELECT type FROM edge WHERE from_id = 1 AND to_id = 2", [], |row| {
                row.get(0)
            })
            .expect("edge row");
        assert_eq!(edge_type, "name");

        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .expect("index count");
        assert_eq!(indexes, 4);
        store.close().expect("close");
    }

    #[test]
    fn refuses_existing_file_and_leaves_it_alone() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("deps.db");
        std::fs::write(&path, "keep me").expect("seed");

        let err = Store::create(&path).expect_err("must refuse");
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert_eq!(err.code(), ErrorCode::OutputExists);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "keep me");
    }

    #[test]
    fn failed_write_rolls_back() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("deps.db");
        let mut store = Store::create(&path).expect("create");

        let mut bad = tables();
        bad.nodes.push(RelationalNode {
            id: 1,
            value: "duplicate id".into(),
            kind: NodeKind::Entity,
        });
        assert!(store.write(&bad).is_err());

        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM node", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0);
    }

    #[test]
    fn schema_failure_removes_new_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("deps.db");

        let err = Store::create_with_schema(&path, "CREATE TABLE node (").expect_err("bad ddl");
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert_eq!(err.code(), ErrorCode::StoreWriteFailed);
        assert!(!path.exists());
    }
}
