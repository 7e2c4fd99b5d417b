pub mod completions;
pub mod graph;
pub mod sqlite;
