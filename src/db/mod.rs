//! Database layer: metadata-driven INSERT/SELECT generation over PostgreSQL.
//!
//! The schema is not declared in Rust. Column lists are read from
//! `information_schema` at runtime and an [`AutoFillPolicy`] decides which
//! columns the engine fills in on its own.

pub mod columns;
pub mod manager;
pub mod query;
pub mod tables;

pub use columns::{AutoFillPolicy, ColumnInfo, PostgresAutoFill};
pub use manager::DatabaseManager;
pub use query::{Projection, SelectQuery};
