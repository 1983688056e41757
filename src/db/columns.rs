//! Column metadata and the policy deciding which columns the engine fills in.

use sea_orm::{DbBackend, FromQueryResult, Statement, Value};

/// One column of a table as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared type, e.g. `bigint`, `uuid`, `timestamp with time zone`
    pub data_type: String,
    /// `GENERATED ... AS IDENTITY`
    pub is_identity: bool,
    /// Default expression, e.g. `nextval('users_id_seq'::regclass)`
    pub default: Option<String>,
}

impl ColumnInfo {
    /// A plain column with no default.
    #[must_use]
    pub fn plain(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_identity: false,
            default: None,
        }
    }
}

/// Raw catalog row. Every field is cast to `text` in the query.
#[derive(Debug, FromQueryResult)]
pub(crate) struct CatalogColumn {
    pub column_name: String,
    pub data_type: String,
    pub is_identity: String,
    pub column_default: Option<String>,
}

impl From<CatalogColumn> for ColumnInfo {
    fn from(row: CatalogColumn) -> Self {
        Self {
            name: row.column_name,
            data_type: row.data_type,
            is_identity: row.is_identity.eq_ignore_ascii_case("YES"),
            default: row.column_default,
        }
    }
}

/// Catalog lookup for the columns of `table`, in declared order.
pub(crate) fn catalog_statement(table: &str) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT column_name::text AS column_name, \
                data_type::text AS data_type, \
                is_identity::text AS is_identity, \
                column_default::text AS column_default \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position;",
        [Value::from(table)],
    )
}

/// Base tables of the `public` schema.
pub(crate) fn list_tables_statement() -> Statement {
    Statement::from_string(
        DbBackend::Postgres,
        "SELECT table_name::text AS table_name \
         FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
         ORDER BY table_name;",
    )
}

/// Decides whether a column is populated by the database engine and must
/// therefore be left out of generated INSERT statements.
pub trait AutoFillPolicy: Send + Sync {
    /// `true` when the engine assigns this column's value on insert.
    fn is_engine_filled(&self, column: &ColumnInfo) -> bool;
}

/// PostgreSQL rules: identity columns, sequence-backed defaults
/// (`serial`/`bigserial`), and uuid columns with a generated default.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresAutoFill;

impl AutoFillPolicy for PostgresAutoFill {
    fn is_engine_filled(&self, column: &ColumnInfo) -> bool {
        if column.is_identity {
            return true;
        }

        match column.default.as_deref() {
            Some(default) => {
                column.data_type.eq_ignore_ascii_case("uuid")
                    || default.to_ascii_lowercase().contains("nextval(")
            }
            None => false,
        }
    }
}

/// Columns that must be supplied by the caller, in declared order.
pub fn writable_columns<'a>(
    columns: &'a [ColumnInfo],
    policy: &dyn AutoFillPolicy,
) -> Vec<&'a ColumnInfo> {
    columns
        .iter()
        .filter(|column| !policy.is_engine_filled(column))
        .collect()
}
