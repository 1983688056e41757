//! Timing and choices for the daily jobs.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, TimeZone, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

/// Prefix of the pinging channel's name
pub const PINGING_PREFIX: &str = "pinging-";

/// Fixed UTC-5, the offset every daily job runs on
#[must_use]
pub fn utc_minus_five() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap_or_else(|| Utc.fix())
}

/// The next instant strictly after `now` whose local time in `offset` is `at`.
#[must_use]
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset);
    let today = local.date_naive().and_time(at);

    let candidate = offset
        .from_local_datetime(&today)
        .single()
        .map_or(now, |dt| dt.with_timezone(&Utc));

    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// The friend name in a channel called `pinging-<name>`.
#[must_use]
pub fn current_pinging_name(channel_name: &str) -> &str {
    channel_name
        .strip_prefix(PINGING_PREFIX)
        .unwrap_or(channel_name)
}

/// Picks a lower-cased friend name different from `current`.
/// `None` when no other name exists.
pub fn pick_channel_name<R: Rng + ?Sized>(
    current: &str,
    names: &[String],
    rng: &mut R,
) -> Option<String> {
    let candidates: Vec<String> = names
        .iter()
        .map(|name| name.to_lowercase())
        .filter(|name| name != current)
        .collect();

    candidates
        .choose(rng)
        .map(|name| format!("{PINGING_PREFIX}{name}"))
}

/// Picks a member for the rotating role, skipping those who hold it.
pub fn pick_role_holder<R: Rng + ?Sized>(
    eligible: &[u64],
    current_holders: &[u64],
    rng: &mut R,
) -> Option<u64> {
    let candidates: Vec<u64> = eligible
        .iter()
        .copied()
        .filter(|id| !current_holders.contains(id))
        .collect();
    candidates.choose(rng).copied()
}

/// One role assignment change made by the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// Give the role to this member
    Add(u64),
    /// Take the role from this member
    Remove(u64),
}

/// Steps that hand the rotating role to `next`.
///
/// The add comes first, so the role is never left without a holder when a
/// later step fails.
#[must_use]
pub fn rotation_steps(current_holders: &[u64], next: u64) -> Vec<RoleChange> {
    std::iter::once(RoleChange::Add(next))
        .chain(
            current_holders
                .iter()
                .filter(|&&holder| holder != next)
                .map(|&holder| RoleChange::Remove(holder)),
        )
        .collect()
}
