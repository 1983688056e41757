//! SQL statement assembly for INSERT and SELECT.
//!
//! Table and column names are validated as plain identifiers and written into
//! the statement text; every value is bound as a `$n` parameter.

use super::columns::{AutoFillPolicy, ColumnInfo, writable_columns};
use crate::errors::{Error, Result};
use sea_orm::{DbBackend, Statement, Value};

/// Checks that `name` is a plain, unquoted SQL identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Builds `INSERT INTO <table> (<cols>) VALUES ($1, ...);` from table metadata.
///
/// Engine-filled columns are skipped; `values` are matched positionally with
/// the remaining columns in declared order.
pub fn build_insert(
    table: &str,
    columns: &[ColumnInfo],
    policy: &dyn AutoFillPolicy,
    values: Vec<Value>,
) -> Result<Statement> {
    let table = validate_identifier(table)?;
    if columns.is_empty() {
        return Err(Error::UnknownTable {
            table: table.to_string(),
        });
    }

    let writable = writable_columns(columns, policy);
    if writable.len() != values.len() {
        return Err(Error::ValueCount {
            table: table.to_string(),
            expected: writable.len(),
            actual: values.len(),
        });
    }

    let names = writable
        .iter()
        .map(|column| validate_identifier(&column.name))
        .collect::<Result<Vec<_>>>()?;
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${i}")).collect();

    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({});",
        names.join(", "),
        placeholders.join(", ")
    );

    Ok(Statement::from_sql_and_values(
        DbBackend::Postgres,
        sql,
        values,
    ))
}

/// One item of a SELECT projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// A plain column
    Column(String),
    /// `COUNT(*) AS <alias>`
    CountAs(String),
}

impl Projection {
    fn render(&self) -> Result<String> {
        match self {
            Self::Column(name) => validate_identifier(name).map(str::to_string),
            Self::CountAs(alias) => Ok(format!("COUNT(*) AS {}", validate_identifier(alias)?)),
        }
    }
}

/// Builder for a single-table SELECT.
///
/// ```text
/// SELECT [DISTINCT] <proj> FROM <t> [WHERE a = $1 AND ...] [GROUP BY ...]
///        [ORDER BY ... ASC|DESC] [LIMIT n];
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    projection: Vec<Projection>,
    filters: Vec<(String, Value)>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    ascending: bool,
    distinct: bool,
    limit: Option<u64>,
}

impl SelectQuery {
    /// `SELECT * FROM <table>`
    #[must_use]
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            projection: Vec::new(),
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            ascending: true,
            distinct: false,
            limit: None,
        }
    }

    /// Adds a column to the projection.
    #[must_use]
    pub fn column(mut self, name: &str) -> Self {
        self.projection.push(Projection::Column(name.to_string()));
        self
    }

    /// Adds `COUNT(*) AS <alias>` to the projection.
    #[must_use]
    pub fn count_as(mut self, alias: &str) -> Self {
        self.projection.push(Projection::CountAs(alias.to_string()));
        self
    }

    /// Adds an equality predicate; predicates are joined with `AND`.
    #[must_use]
    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Appends a GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    /// Appends an ORDER BY column.
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(column.to_string());
        self
    }

    /// Direction applied to the ORDER BY list (ascending by default).
    #[must_use]
    pub const fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// `SELECT DISTINCT`
    #[must_use]
    pub const fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Name of the queried table
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Renders the statement with bound filter values.
    pub fn build(&self) -> Result<Statement> {
        let table = validate_identifier(&self.table)?;

        let projection = if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection
                .iter()
                .map(Projection::render)
                .collect::<Result<Vec<_>>>()?
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {}{projection} FROM {table}",
            if self.distinct { "DISTINCT " } else { "" }
        );

        let mut values = Vec::with_capacity(self.filters.len());
        if !self.filters.is_empty() {
            let predicates = self
                .filters
                .iter()
                .enumerate()
                .map(|(i, (column, value))| {
                    values.push(value.clone());
                    validate_identifier(column).map(|column| format!("{column} = ${}", i + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&join_identifiers(&self.group_by)?);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&join_identifiers(&self.order_by)?);
            sql.push_str(if self.ascending { " ASC" } else { " DESC" });
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql.push(';');

        Ok(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
    }
}

fn join_identifiers(names: &[String]) -> Result<String> {
    Ok(names
        .iter()
        .map(|name| validate_identifier(name))
        .collect::<Result<Vec<_>>>()?
        .join(", "))
}
