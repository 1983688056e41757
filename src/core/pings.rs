//! Roll-the-ping: victim selection, recording, and rankings.

use super::{db_id, from_db_id};
use crate::db::{DatabaseManager, SelectQuery, tables};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{instrument, warn};

/// Members holding a role with this name (case-insensitive) are never pinged.
pub const OPT_OUT_ROLE: &str = "has no interesting roles";

/// A member that could be pinged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCandidate {
    /// Member user id
    pub user_id: u64,
    /// Whether the member is a bot
    pub is_bot: bool,
    /// Names of the member's roles
    pub role_names: Vec<String>,
}

impl PingCandidate {
    /// Not a bot and not opted out.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        !self.is_bot
            && !self
                .role_names
                .iter()
                .any(|name| name.to_lowercase() == OPT_OUT_ROLE)
    }
}

/// Picks a random eligible member.
pub fn choose_victim<R: Rng + ?Sized>(candidates: &[PingCandidate], rng: &mut R) -> Option<u64> {
    let eligible: Vec<u64> = candidates
        .iter()
        .filter(|candidate| candidate.is_eligible())
        .map(|candidate| candidate.user_id)
        .collect();
    eligible.choose(rng).copied()
}

/// The reply sent for `/rtp`.
#[must_use]
pub fn ping_announcement(pinger_name: &str, victim_mention: &str) -> String {
    format!("By fate, {pinger_name} has pinged {victim_mention}. Congrats!")
}

/// A row of `roll_the_pings`.
#[derive(Debug, Clone)]
pub struct PingRecord {
    /// Id of the bot's announcement message
    pub message_id: u64,
    /// Member who ran `/rtp`
    pub pinger_id: u64,
    /// Member who got pinged
    pub pingee_id: u64,
    /// Guild the command ran in
    pub guild_id: u64,
    /// When the command ran
    pub created_at: DateTime<Utc>,
}

/// Stores a ping. Returns `false` on failure (already logged).
#[instrument(skip(db))]
pub async fn record_ping(db: &DatabaseManager, record: &PingRecord) -> bool {
    db.insert_row(
        tables::ROLL_THE_PINGS,
        vec![
            db_id(record.message_id).into(),
            db_id(record.pinger_id).into(),
            db_id(record.pingee_id).into(),
            db_id(record.guild_id).into(),
            record.created_at.into(),
        ],
    )
    .await
}

/// Which side of the ping is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingRole {
    /// Members who got pinged
    Victim,
    /// Members who ran `/rtp`
    Perpetrator,
}

impl PingRole {
    /// Column holding this side's user id
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Victim => "pingee_id",
            Self::Perpetrator => "pinger_id",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Victim => "Victim",
            Self::Perpetrator => "Perpetrator",
        }
    }
}

/// Ping totals per user for one guild, most pings first unless `reverse`.
///
/// No LIMIT is applied in SQL: members who left the guild are skipped while
/// formatting, so the cut-off happens there.
#[must_use]
pub fn ping_counts_query(role: PingRole, guild_id: u64, reverse: bool) -> SelectQuery {
    SelectQuery::from(tables::ROLL_THE_PINGS)
        .count_as("pings")
        .column(role.column())
        .filter_eq("guild_id", db_id(guild_id))
        .group_by(role.column())
        .order_by("pings")
        .ascending(reverse)
}

/// `(user id, ping count)` rows. `None` when the query failed.
pub async fn fetch_ping_counts(
    db: &DatabaseManager,
    role: PingRole,
    guild_id: u64,
    reverse: bool,
) -> Option<Vec<(u64, i64)>> {
    let rows = db
        .fetch_rows(&ping_counts_query(role, guild_id, reverse))
        .await?;

    let mut counts = Vec::with_capacity(rows.len());
    for row in rows {
        match (
            row.try_get::<i64>("", role.column()),
            row.try_get::<i64>("", "pings"),
        ) {
            (Ok(user_id), Ok(pings)) => counts.push((from_db_id(user_id), pings)),
            (Err(e), _) | (_, Err(e)) => warn!("Skipping malformed ping count row: {e}"),
        }
    }
    Some(counts)
}

/// One ranked entry: display name if the user is still a member, and count.
#[derive(Debug, Clone)]
pub struct RankingEntry {
    /// `None` when the user has left the guild
    pub display_name: Option<String>,
    /// Number of pings
    pub pings: i64,
}

/// Formats a ping ranking.
///
/// `count == 0` lists everyone; negative counts are rejected with a hint.
#[must_use]
pub fn format_ranking(
    role: PingRole,
    guild_name: &str,
    entries: &[RankingEntry],
    count: i64,
    reverse: bool,
) -> String {
    if count < 0 {
        return "Please input a `count` greater than 0, \
                or 0 to list all relevant server members."
            .to_string();
    }

    if entries.is_empty() {
        return "No applicable records for the search were found.".to_string();
    }

    let label = role.label();
    let limit = usize::try_from(count).unwrap_or(usize::MAX);

    let mut lines = Vec::new();
    for entry in entries {
        if limit != 0 && lines.len() == limit {
            break;
        }
        let Some(name) = &entry.display_name else {
            continue;
        };
        lines.push(format!(
            "{}. {name} (pinged {} times)",
            lines.len() + 1,
            entry.pings
        ));
    }

    if lines.is_empty() {
        return format!("No Ping {label}s were found with the given search.");
    }

    let title = if count == 0 {
        format!(
            "## All Ping {label}s in {guild_name}{}",
            if reverse { " in reverse order" } else { "" }
        )
    } else {
        format!(
            "## {} {} Ping {label}{} in {guild_name}",
            if reverse { "Bottom" } else { "Top" },
            lines.len(),
            if lines.len() == 1 { "" } else { "s" }
        )
    };

    format!("{title}\n\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn candidate(user_id: u64, is_bot: bool, roles: &[&str]) -> PingCandidate {
        PingCandidate {
            user_id,
            is_bot,
            role_names: roles.iter().map(ToString::to_string).collect(),
        }
    }

    fn entry(name: Option<&str>, pings: i64) -> RankingEntry {
        RankingEntry {
            display_name: name.map(ToString::to_string),
            pings,
        }
    }

    #[test]
    fn test_choose_victim_skips_bots_and_opt_outs() {
        let candidates = vec![
            candidate(1, true, &[]),
            candidate(2, false, &["Has No Interesting Roles"]),
            candidate(3, false, &["apex"]),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(choose_victim(&candidates, &mut rng), Some(3));
        }
    }

    #[test]
    fn test_choose_victim_none_eligible() {
        let candidates = vec![candidate(1, true, &[])];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(choose_victim(&candidates, &mut rng), None);
    }

    #[test]
    fn test_ping_counts_query_sql() {
        let stmt = ping_counts_query(PingRole::Victim, 99, false).build().unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS pings, pingee_id FROM roll_the_pings \
             WHERE guild_id = $1 GROUP BY pingee_id ORDER BY pings DESC;"
        );
    }

    #[test]
    fn test_format_ranking_top() {
        let entries = vec![entry(Some("Scuzz"), 5), entry(None, 4), entry(Some("Declan"), 2)];
        let text = format_ranking(PingRole::Victim, "soup", &entries, 5, false);
        assert_eq!(
            text,
            "## Top 2 Ping Victims in soup\n\n\
             1. Scuzz (pinged 5 times)\n\
             2. Declan (pinged 2 times)"
        );
    }

    #[test]
    fn test_format_ranking_limit_counts_present_members() {
        let entries = vec![entry(None, 9), entry(Some("Scuzz"), 5), entry(Some("Declan"), 2)];
        let text = format_ranking(PingRole::Perpetrator, "soup", &entries, 1, true);
        assert_eq!(
            text,
            "## Bottom 1 Ping Perpetrator in soup\n\n1. Scuzz (pinged 5 times)"
        );
    }

    #[test]
    fn test_format_ranking_all_reverse() {
        let entries = vec![entry(Some("Declan"), 1)];
        let text = format_ranking(PingRole::Victim, "soup", &entries, 0, true);
        assert!(text.starts_with("## All Ping Victims in soup in reverse order\n\n"));
    }

    #[test]
    fn test_format_ranking_edge_cases() {
        assert!(
            format_ranking(PingRole::Victim, "soup", &[], -1, false).starts_with("Please input")
        );
        assert_eq!(
            format_ranking(PingRole::Victim, "soup", &[], 5, false),
            "No applicable records for the search were found."
        );
        assert_eq!(
            format_ranking(PingRole::Perpetrator, "soup", &[entry(None, 3)], 5, false),
            "No Ping Perpetrators were found with the given search."
        );
    }
}
