//! rushgraph-core library.
//!
//! Reconstructs the package dependency graph of a rush monorepo from its
//! workspace manifest, pnpm lockfile and installed package manifests, writes
//! it as a statement file, and projects statement files into a SQLite
//! node/edge store.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module boundaries, `anyhow::Result`
//!   with context for pipeline entry points.
//! - **Logging**: `tracing` macros with structured fields.

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod loader;
pub mod lockfile;
pub mod model;
pub mod nquads;
pub mod relational;

pub use db::{ExportReport, create_sqlite_db};
pub use error::ErrorCode;
pub use graph::{GraphReport, create_graph};
