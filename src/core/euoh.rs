//! VC euohs: the lockable recording system and per-member summaries.

use super::db_id;
use crate::db::{DatabaseManager, SelectQuery, tables};
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

/// A toggle admins can flip to pause a feature.
#[derive(Debug, Default)]
pub struct FeatureLock(AtomicBool);

impl FeatureLock {
    /// An unlocked feature
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether the feature is currently locked
    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Locks the feature. Returns `false` if it was already locked.
    pub fn lock(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    /// Unlocks the feature. Returns `false` if it was already unlocked.
    pub fn unlock(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// A row of `vc_euohs`.
#[derive(Debug, Clone)]
pub struct EuohRecord {
    /// Member receiving the euoh
    pub recipient_id: u64,
    /// One of the known euoh types
    pub euoh_type: String,
    /// Member handing it out
    pub giver_id: u64,
    /// Guild it happened in
    pub guild_id: u64,
    /// When it was recorded
    pub created_at: DateTime<Utc>,
    /// Optional link proving it happened
    pub evidence_url: Option<String>,
}

/// Stores a euoh. Returns `false` on failure (already logged).
#[instrument(skip(db))]
pub async fn record_euoh(db: &DatabaseManager, record: &EuohRecord) -> bool {
    db.insert_row(
        tables::VC_EUOHS,
        vec![
            db_id(record.recipient_id).into(),
            record.euoh_type.as_str().into(),
            db_id(record.giver_id).into(),
            db_id(record.guild_id).into(),
            record.created_at.into(),
            record.evidence_url.clone().into(),
        ],
    )
    .await
}

/// Number of euohs of one type
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct EuohCount {
    /// How many were given
    pub euoh_count: i64,
    /// Which type
    pub euoh_type: String,
}

/// Euoh totals per type for a member of a guild.
#[must_use]
pub fn euoh_counts_query(guild_id: u64, recipient_id: u64) -> SelectQuery {
    SelectQuery::from(tables::VC_EUOHS)
        .count_as("euoh_count")
        .column("euoh_type")
        .filter_eq("guild_id", db_id(guild_id))
        .filter_eq("recipient_id", db_id(recipient_id))
        .group_by("euoh_type")
        .order_by("euoh_type")
}

/// Fetches a member's euoh totals. `None` when the query failed.
pub async fn fetch_euoh_counts(
    db: &DatabaseManager,
    guild_id: u64,
    recipient_id: u64,
) -> Option<Vec<EuohCount>> {
    db.fetch_as(&euoh_counts_query(guild_id, recipient_id)).await
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// The `/euoh vc get` reply.
#[must_use]
pub fn format_euoh_counts(display_name: &str, counts: &[EuohCount]) -> String {
    if counts.is_empty() {
        return format!("No VC euohs for {display_name} were found (yet...).");
    }

    let lines: Vec<String> = counts
        .iter()
        .map(|count| {
            format!(
                "- {} {} Meuohment{}",
                count.euoh_count,
                title_case(&count.euoh_type),
                if count.euoh_count == 1 { "" } else { "s" }
            )
        })
        .collect();

    format!("# {display_name} VC Meuohments\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{catalog_row, ok_exec};
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn count(n: i64, euoh_type: &str) -> EuohCount {
        EuohCount {
            euoh_count: n,
            euoh_type: euoh_type.to_string(),
        }
    }

    #[test]
    fn test_lock_transitions() {
        let lock = FeatureLock::new();
        assert!(!lock.is_locked());
        assert!(lock.lock());
        assert!(!lock.lock());
        assert!(lock.is_locked());
        assert!(lock.unlock());
        assert!(!lock.unlock());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_format_counts() {
        let text = format_euoh_counts("Declan", &[count(1, "scuzz"), count(3, "kaeley")]);
        assert_eq!(
            text,
            "# Declan VC Meuohments\n- 1 Scuzz Meuohment\n- 3 Kaeley Meuohments"
        );
    }

    #[test]
    fn test_format_no_counts() {
        assert_eq!(
            format_euoh_counts("Declan", &[]),
            "No VC euohs for Declan were found (yet...)."
        );
    }

    #[test]
    fn test_counts_query_filters_by_guild_and_recipient() {
        let stmt = euoh_counts_query(1, 2).build().unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS euoh_count, euoh_type FROM vc_euohs \
             WHERE guild_id = $1 AND recipient_id = $2 GROUP BY euoh_type ORDER BY euoh_type ASC;"
        );
    }

    #[tokio::test]
    async fn test_record_euoh_without_evidence_binds_null() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                catalog_row("id", "integer", false, Some("nextval('vc_euohs_id_seq'::regclass)")),
                catalog_row("recipient_id", "bigint", false, None),
                catalog_row("euoh_type", "text", false, None),
                catalog_row("giver_id", "bigint", false, None),
                catalog_row("guild_id", "bigint", false, None),
                catalog_row("created_at", "timestamp with time zone", false, None),
                catalog_row("evidence_url", "text", false, None),
            ]])
            .append_exec_results([ok_exec(1)])
            .into_connection();
        let manager = DatabaseManager::new(db);

        let record = EuohRecord {
            recipient_id: 2,
            euoh_type: "armando".to_string(),
            giver_id: 3,
            guild_id: 4,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            evidence_url: None,
        };
        assert!(record_euoh(&manager, &record).await);
    }

    #[tokio::test]
    async fn test_fetch_counts_decodes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([
                ("euoh_count", Value::from(2_i64)),
                ("euoh_type", Value::from("declan")),
            ])]])
            .into_connection();
        let manager = DatabaseManager::new(db);

        let counts = fetch_euoh_counts(&manager, 1, 2).await.unwrap();
        assert_eq!(counts, vec![count(2, "declan")]);
    }
}
