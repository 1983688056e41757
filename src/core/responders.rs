//! Canned replies to ordinary chat messages.

use rand::Rng;
use rand::seq::SliceRandom;

/// Reply sent to every update posted in the game-updates channel
pub const IGH_BRO: &str = "igh bro";

/// Continues the "crazy? i was crazy once" chain. Case-insensitive.
#[must_use]
pub fn crazy_response(content: &str) -> Option<&'static str> {
    let msg = content.to_lowercase();

    if msg.contains("crazy") {
        return Some(if msg.contains("i was crazy once") {
            "they locked me in a room."
        } else {
            "crazy? i was crazy once."
        });
    }

    if msg.contains("locked") && msg.contains("in a room") {
        return Some("a rubber room.");
    }

    if msg.contains("rubber room") {
        return Some(if msg.contains("a rubber room with rats") {
            "and rats make me crazy."
        } else {
            "a rubber room with rats."
        });
    }

    None
}

/// Any message in the game-updates channel, except the bot's own.
#[must_use]
pub fn should_igh_bro(
    channel_id: u64,
    updates_channel: u64,
    author_id: u64,
    bot_ids: &[u64],
) -> bool {
    channel_id == updates_channel && !bot_ids.contains(&author_id)
}

/// Messages in the archive guild's clip channels are relayed.
#[must_use]
pub fn is_clip_relay(guild_id: Option<u64>, archive_guild: u64, channel_name: &str) -> bool {
    guild_id == Some(archive_guild) && channel_name.contains("clips")
}

/// Outcome of looking at a message's embeds after they had time to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedVerdict {
    /// A link that did not embed
    Failed,
    /// An embed worth celebrating
    Celebrate,
    /// Nothing to say
    Quiet,
}

/// Judges a re-fetched message. `roll` is uniform in `0.0..1.0`.
#[must_use]
pub fn evaluate_embed(
    has_embeds: bool,
    content: &str,
    in_pov_channel: bool,
    roll: f64,
    success_chance: f64,
) -> EmbedVerdict {
    if !has_embeds {
        return if content.contains("https://") {
            EmbedVerdict::Failed
        } else {
            EmbedVerdict::Quiet
        };
    }

    if in_pov_channel || roll >= success_chance {
        return EmbedVerdict::Quiet;
    }

    EmbedVerdict::Celebrate
}

/// Random entry of `gifs`, `None` when the list is empty.
pub fn pick_gif<'a, R: Rng + ?Sized>(gifs: &'a [String], rng: &mut R) -> Option<&'a str> {
    gifs.choose(rng).map(String::as_str)
}
