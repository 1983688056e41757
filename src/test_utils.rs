//! Shared test utilities for Petrichor.
//!
//! Database tests run against `sea_orm::MockDatabase`; these helpers build
//! the catalog rows and exec results the mock hands back.

use sea_orm::{MockExecResult, Value};
use std::collections::BTreeMap;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// One row of the `information_schema.columns` lookup.
///
/// # Arguments
/// * `name` - Column name
/// * `data_type` - Declared type, e.g. `bigint`
/// * `is_identity` - Rendered as `YES`/`NO` like the catalog does
/// * `default` - Default expression, if any
pub fn catalog_row(
    name: &str,
    data_type: &str,
    is_identity: bool,
    default: Option<&str>,
) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("column_name", Value::from(name)),
        ("data_type", Value::from(data_type)),
        (
            "is_identity",
            Value::from(if is_identity { "YES" } else { "NO" }),
        ),
        ("column_default", Value::from(default.map(str::to_string))),
    ])
}

/// A successful exec touching `rows` rows.
pub const fn ok_exec(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}
