//! `DatabaseManager` - the single entry point for database access.
//!
//! Callers hand over a table name and positional values (INSERT) or a
//! [`SelectQuery`] (SELECT). Failures never propagate: they are logged and
//! reported as `false` / `None`.

use super::columns::{
    AutoFillPolicy, CatalogColumn, ColumnInfo, PostgresAutoFill, catalog_statement,
    list_tables_statement,
};
use super::query::{SelectQuery, build_insert, validate_identifier};
use crate::config::database;
use crate::errors::{Error, Result};
use sea_orm::sqlx::error::ErrorKind;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, QueryResult, RuntimeErr,
    Statement, TransactionTrait, Value,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Pooled PostgreSQL connection plus the auto-fill policy used for inserts.
pub struct DatabaseManager {
    conn: DatabaseConnection,
    policy: Arc<dyn AutoFillPolicy>,
}

impl std::fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseManager").finish_non_exhaustive()
    }
}

impl DatabaseManager {
    /// Wraps an existing connection, using the PostgreSQL auto-fill rules.
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            policy: Arc::new(PostgresAutoFill),
        }
    }

    /// Replaces the auto-fill policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AutoFillPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Connects using `DATABASE_URL` or the `POSTGRES_*` variables.
    pub async fn connect() -> Result<Self> {
        let url = database::get_database_url()?;
        let conn = database::create_connection(&url).await?;
        info!("Connected to database!");
        Ok(Self::new(conn))
    }

    /// Lists the base tables of the `public` schema and logs them.
    /// Used at startup to verify the connection.
    #[instrument(skip(self))]
    pub async fn ping_tables(&self) -> Result<Vec<String>> {
        let rows = self.conn.query_all(list_tables_statement()).await?;
        let tables = rows
            .iter()
            .map(|row| row.try_get::<String>("", "table_name"))
            .collect::<std::result::Result<Vec<_>, DbErr>>()?;
        info!("Tables: {:?}", tables);
        Ok(tables)
    }

    /// Column metadata of `table`, in declared order.
    #[instrument(skip(self))]
    pub async fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let table = validate_identifier(table)?;
        let rows = CatalogColumn::find_by_statement(catalog_statement(table))
            .all(&self.conn)
            .await?;
        debug!("Table {} has {} columns", table, rows.len());
        Ok(rows.into_iter().map(ColumnInfo::from).collect())
    }

    /// Inserts one row into `table`.
    ///
    /// `values` line up with the table's columns in declared order, skipping
    /// the ones the engine fills in. Returns `true` iff the statement ran and
    /// committed.
    #[instrument(skip(self, values), fields(values = values.len()))]
    pub async fn insert_row(&self, table: &str, values: Vec<Value>) -> bool {
        match self.try_insert_row(table, values).await {
            Ok(()) => {
                info!("Row inserted into {table}");
                true
            }
            Err(e) => {
                log_failure(&format!("Insert into {table} failed"), &e);
                false
            }
        }
    }

    async fn try_insert_row(&self, table: &str, values: Vec<Value>) -> Result<()> {
        let columns = self.table_columns(table).await?;
        let stmt = build_insert(table, &columns, self.policy.as_ref(), values)?;
        debug!(statement = %stmt, "Executing insert");
        self.execute(stmt).await
    }

    /// Runs a SELECT. `Some(vec![])` is an empty result; `None` means the
    /// query failed (the failure is logged).
    #[instrument(skip(self, query), fields(table = query.table()))]
    pub async fn fetch_rows(&self, query: &SelectQuery) -> Option<Vec<QueryResult>> {
        match self.try_fetch(query).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                log_failure(&format!("Fetch from {} failed", query.table()), &e);
                None
            }
        }
    }

    /// Like [`fetch_rows`](Self::fetch_rows), decoding each row into `T`.
    /// A row that fails to decode makes the whole fetch `None`.
    pub async fn fetch_as<T: FromQueryResult>(&self, query: &SelectQuery) -> Option<Vec<T>> {
        let rows = self.fetch_rows(query).await?;
        rows.iter()
            .map(|row| T::from_query_result(row, ""))
            .collect::<std::result::Result<Vec<_>, DbErr>>()
            .inspect_err(|e| error!("Could not decode rows from {}: {e}", query.table()))
            .ok()
    }

    async fn try_fetch(&self, query: &SelectQuery) -> Result<Vec<QueryResult>> {
        let stmt = query.build()?;
        debug!(statement = %stmt, "Executing select");
        let txn = self.conn.begin().await?;
        let rows = txn.query_all(stmt).await?;
        txn.commit().await?;
        Ok(rows)
    }

    async fn execute(&self, stmt: Statement) -> Result<()> {
        let txn = self.conn.begin().await?;
        let result = txn.execute(stmt).await?;
        txn.commit().await?;
        debug!("{} row(s) affected", result.rows_affected());
        Ok(())
    }
}

/// How a failed statement is reported in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    UniqueViolation,
    ForeignKeyViolation,
    Other,
}

fn classify_failure(error: &Error) -> FailureKind {
    let Error::Database(
        DbErr::Exec(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db_err)))
        | DbErr::Query(RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db_err))),
    ) = error
    else {
        return FailureKind::Other;
    };

    match db_err.kind() {
        ErrorKind::UniqueViolation => FailureKind::UniqueViolation,
        ErrorKind::ForeignKeyViolation => FailureKind::ForeignKeyViolation,
        _ => FailureKind::Other,
    }
}

fn log_failure(context: &str, error: &Error) {
    match classify_failure(error) {
        FailureKind::UniqueViolation => {
            warn!("{context}: uniqueness constraint violated ({error})");
        }
        FailureKind::ForeignKeyViolation => {
            warn!("{context}: foreign key constraint violated ({error})");
        }
        FailureKind::Other => error!("{context}: {error}"),
    }
}
