//! Core logic - framework-agnostic record building, formatting and selection.
//!
//! Nothing in here touches poise or serenity types. The bot layer extracts
//! plain ids, names and timestamps from Discord objects and calls into these
//! modules.

pub mod clips;
pub mod euoh;
pub mod pings;
pub mod responders;
pub mod schedule;
pub mod side_eye;
pub mod users;

use chrono::{DateTime, Utc};

/// Discord snowflakes are stored in `bigint` columns.
///
/// Snowflakes carry a 42-bit timestamp in their top bits, so they never reach
/// the sign bit of an `i64`.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub const fn db_id(id: u64) -> i64 {
    id as i64
}

/// Inverse of [`db_id`].
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub const fn from_db_id(id: i64) -> u64 {
    id as u64
}

/// Converts a unix timestamp (seconds) into a UTC datetime, clamping
/// out-of-range input to the epoch.
#[must_use]
pub fn utc_from_unix(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_round_trip() {
        let id = 1_390_943_526_572_789_821_u64;
        assert_eq!(from_db_id(db_id(id)), id);
        assert!(db_id(id) > 0);
    }

    #[test]
    fn test_utc_from_unix() {
        assert_eq!(utc_from_unix(0).timestamp(), 0);
        assert_eq!(utc_from_unix(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
