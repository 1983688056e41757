//! Member bookkeeping.

use super::db_id;
use crate::db::{DatabaseManager, tables};
use tracing::instrument;

/// Records a member the first time they are seen joining.
///
/// A second join of the same member violates the `user_id` unique constraint;
/// that is logged by the manager and reported as `false`.
#[instrument(skip(db))]
pub async fn record_user(db: &DatabaseManager, user_id: u64, username: &str) -> bool {
    db.insert_row(tables::USERS, vec![db_id(user_id).into(), username.into()])
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{catalog_row, ok_exec};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    #[tokio::test]
    async fn test_record_user_twice() {
        let users = vec![
            catalog_row("id", "uuid", false, Some("gen_random_uuid()")),
            catalog_row("user_id", "bigint", false, None),
            catalog_row("username", "text", false, None),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([users.clone(), users])
            .append_exec_results([ok_exec(1)])
            .append_exec_errors([DbErr::Custom("duplicate key".to_string())])
            .into_connection();
        let manager = DatabaseManager::new(db);

        assert!(record_user(&manager, 42, "scuzz").await);
        assert!(!record_user(&manager, 42, "scuzz").await);
    }
}
