//! Side-eye tracking for one watched friend.
//!
//! Sightings come from three places: a custom emote in a message, a sticker,
//! or an emote reaction. All of them land in `side_eyes`.

use super::{db_id, from_db_id};
use crate::db::{DatabaseManager, SelectQuery, tables};
use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::FromQueryResult;
use std::sync::LazyLock;
use tracing::instrument;

static CUSTOM_EMOTE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"<a?:[^:>\s]+:(\d+)>"));

/// First emote id from `watched` used in `content`, in `watched` order.
#[must_use]
pub fn find_side_eye_emote(content: &str, watched: &[u64]) -> Option<u64> {
    let Ok(re) = CUSTOM_EMOTE.as_ref() else {
        return None;
    };

    let used: Vec<u64> = re
        .captures_iter(content)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect();

    watched.iter().copied().find(|id| used.contains(id))
}

/// First sticker in `stickers` that is a watched side-eye sticker.
#[must_use]
pub fn find_side_eye_sticker(stickers: &[u64], watched: &[u64]) -> Option<u64> {
    stickers.iter().copied().find(|id| watched.contains(id))
}

/// A row of `side_eyes`.
#[derive(Debug, Clone)]
pub struct SideEyeRecord {
    /// Guild of the message
    pub guild_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// The message itself (or the message reacted to)
    pub message_id: u64,
    /// Emote or sticker id
    pub emoji_id: u64,
    /// `true` for emotes, `false` for stickers
    pub is_emoji: bool,
    /// `true` when sent in a message, `false` for reactions
    pub is_message: bool,
    /// Creation time of the message
    pub message_time: DateTime<Utc>,
}

/// Stores a sighting. Returns `false` on failure (already logged).
#[instrument(skip(db))]
pub async fn record_side_eye(db: &DatabaseManager, record: &SideEyeRecord) -> bool {
    db.insert_row(
        tables::SIDE_EYES,
        vec![
            db_id(record.guild_id).into(),
            db_id(record.channel_id).into(),
            db_id(record.message_id).into(),
            db_id(record.emoji_id).into(),
            record.is_emoji.into(),
            record.is_message.into(),
            record.message_time.into(),
        ],
    )
    .await
}

/// Where and when a side eye happened
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SideEyeRow {
    /// Channel id as stored
    pub channel_id: i64,
    /// Message id as stored
    pub message_id: i64,
    /// Message time
    pub message_time: DateTime<Utc>,
}

impl SideEyeRow {
    /// Channel id as a snowflake
    #[must_use]
    pub const fn channel(&self) -> u64 {
        from_db_id(self.channel_id)
    }

    /// Message id as a snowflake
    #[must_use]
    pub const fn message(&self) -> u64 {
        from_db_id(self.message_id)
    }
}

/// The newest sighting in a guild.
#[must_use]
pub fn last_side_eye_query(guild_id: u64) -> SelectQuery {
    SelectQuery::from(tables::SIDE_EYES)
        .column("channel_id")
        .column("message_id")
        .column("message_time")
        .filter_eq("guild_id", db_id(guild_id))
        .order_by("message_time")
        .ascending(false)
        .limit(1)
}

/// Every sighting time in a guild, oldest first.
#[must_use]
pub fn side_eye_times_query(guild_id: u64) -> SelectQuery {
    SelectQuery::from(tables::SIDE_EYES)
        .column("message_time")
        .filter_eq("guild_id", db_id(guild_id))
        .order_by("message_time")
}

/// `None` when the query failed, `Some(None)` when there are no sightings.
pub async fn fetch_last_side_eye(
    db: &DatabaseManager,
    guild_id: u64,
) -> Option<Option<SideEyeRow>> {
    let rows: Vec<SideEyeRow> = db.fetch_as(&last_side_eye_query(guild_id)).await?;
    Some(rows.into_iter().next())
}

#[derive(Debug, FromQueryResult)]
struct SideEyeTime {
    message_time: DateTime<Utc>,
}

/// All sighting times, oldest first. `None` when the query failed.
pub async fn fetch_side_eye_times(
    db: &DatabaseManager,
    guild_id: u64,
) -> Option<Vec<DateTime<Utc>>> {
    let rows: Vec<SideEyeTime> = db.fetch_as(&side_eye_times_query(guild_id)).await?;
    Some(rows.into_iter().map(|row| row.message_time).collect())
}

/// A span broken down into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    /// Whole days
    pub days: i64,
    /// Hours past the last whole day
    pub hours: i64,
    /// Minutes past the last whole hour
    pub minutes: i64,
    /// Seconds past the last whole minute
    pub seconds: i64,
}

impl ElapsedTime {
    /// Splits the span between `from` and `to`; negative spans clamp to zero.
    #[must_use]
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let total = (to - from).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }

    /// "1 day, 2 hours, 0 minutes, and 1 second"
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{}, {}, {}, and {}",
            plural(self.days, "day"),
            plural(self.hours, "hour"),
            plural(self.minutes, "minute"),
            plural(self.seconds, "second")
        )
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{n} {unit}{}", if n == 1 { "" } else { "s" })
}

/// Reply for `/days-since-last-side-eye`.
#[must_use]
pub fn since_last_reply(friend: &str, elapsed: &ElapsedTime, evidence_url: &str) -> String {
    format!(
        "It has been {} since {friend} last sent a side eye emoji. Evidence: {evidence_url}",
        elapsed.describe()
    )
}

/// Reply when a guild has no sightings at all.
#[must_use]
pub fn never_reply(friend: &str) -> String {
    format!(
        "Apparently {friend} has never sent a side eye emote or reaction \
         in this server (this simply can not be true)"
    )
}

/// A stretch without any sightings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drought {
    /// The sighting that started it
    pub start: DateTime<Utc>,
    /// The sighting that ended it, or now
    pub end: DateTime<Utc>,
    /// Still going: no sighting since `start`
    pub ongoing: bool,
}

impl Drought {
    /// Reply for `/longest-side-eye-drought`.
    #[must_use]
    pub fn describe(&self, friend: &str) -> String {
        let elapsed = ElapsedTime::between(self.start, self.end);
        let window = if self.ongoing {
            format!("since {} and counting", self.start.format("%Y-%m-%d"))
        } else {
            format!(
                "from {} to {}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        };
        format!(
            "The longest {friend} has gone without a side eye is {} ({window}).",
            elapsed.describe()
        )
    }
}

/// The longest gap between consecutive sightings, counting the ongoing gap
/// up to `now`. `None` without sightings.
#[must_use]
pub fn longest_drought(times: &[DateTime<Utc>], now: DateTime<Utc>) -> Option<Drought> {
    let mut sorted = times.to_vec();
    sorted.sort_unstable();

    let last = *sorted.last()?;
    let ongoing = Drought {
        start: last,
        end: now.max(last),
        ongoing: true,
    };

    sorted
        .windows(2)
        .map(|pair| Drought {
            start: pair[0],
            end: pair[1],
            ongoing: false,
        })
        .chain(std::iter::once(ongoing))
        .max_by_key(|drought| drought.end - drought.start)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_emote_detection_follows_watch_order() {
        let watched = [30, 20];
        assert_eq!(find_side_eye_emote("hm <:eyes:20> <a:look:30>", &watched), Some(30));
        assert_eq!(find_side_eye_emote("hm <:eyes:20>", &watched), Some(20));
        assert_eq!(find_side_eye_emote("hm <:eyes:21>", &watched), None);
        assert_eq!(find_side_eye_emote("plain 20 text", &watched), None);
    }

    #[test]
    fn test_emote_id_must_match_exactly() {
        assert_eq!(find_side_eye_emote("<:eyes:120>", &[20]), None);
    }

    #[test]
    fn test_sticker_detection() {
        assert_eq!(find_side_eye_sticker(&[1, 2], &[2]), Some(2));
        assert_eq!(find_side_eye_sticker(&[], &[2]), None);
    }

    #[test]
    fn test_elapsed_breakdown() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 1, 2, 2, 1, 1).unwrap();
        let elapsed = ElapsedTime::between(from, to);
        assert_eq!(
            elapsed,
            ElapsedTime {
                days: 1,
                hours: 2,
                minutes: 1,
                seconds: 1
            }
        );
        assert_eq!(elapsed.describe(), "1 day, 2 hours, 1 minute, and 1 second");
    }

    #[test]
    fn test_elapsed_never_negative() {
        let elapsed = ElapsedTime::between(at(2, 0), at(1, 0));
        assert_eq!(elapsed.describe(), "0 days, 0 hours, 0 minutes, and 0 seconds");
    }

    #[test]
    fn test_longest_drought_between_sightings() {
        let times = [at(1, 0), at(5, 0), at(6, 0)];
        let drought = longest_drought(&times, at(7, 0)).unwrap();
        assert_eq!((drought.start, drought.end), (at(1, 0), at(5, 0)));
        assert!(!drought.ongoing);
    }

    #[test]
    fn test_longest_drought_ongoing() {
        let times = [at(3, 0), at(1, 0)];
        let drought = longest_drought(&times, at(20, 0)).unwrap();
        assert_eq!((drought.start, drought.end), (at(3, 0), at(20, 0)));
        assert!(drought.ongoing);
        assert_eq!(longest_drought(&[], at(20, 0)), None);
    }

    #[test]
    fn test_last_side_eye_query() {
        let stmt = last_side_eye_query(5).build().unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT channel_id, message_id, message_time FROM side_eyes \
             WHERE guild_id = $1 ORDER BY message_time DESC LIMIT 1;"
        );
    }

    #[test]
    fn test_replies() {
        let elapsed = ElapsedTime::between(at(1, 0), at(2, 0));
        assert_eq!(
            since_last_reply("kaeley", &elapsed, "https://discord.com/x"),
            "It has been 1 day, 0 hours, 0 minutes, and 0 seconds since kaeley \
             last sent a side eye emoji. Evidence: https://discord.com/x"
        );
        assert_eq!(
            Drought {
                start: at(1, 0),
                end: at(5, 0),
                ongoing: false,
            }
            .describe("kaeley"),
            "The longest kaeley has gone without a side eye is 4 days, 0 hours, \
             0 minutes, and 0 seconds (from 2025-06-01 to 2025-06-05)."
        );
    }
}
