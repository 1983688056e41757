//! Side-eye emote reactions from the watched friend.

use crate::bot::BotData;
use crate::core::side_eye::{self, SideEyeRecord};
use crate::core::utc_from_unix;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

/// Records the reaction when the watched friend adds a side-eye emote.
pub async fn on_reaction_add(reaction: &serenity::Reaction, data: &BotData) {
    let Some(user_id) = reaction.user_id else {
        return;
    };
    if data.config.side_eye_subject != Some(user_id.get()) {
        return;
    }

    let serenity::ReactionType::Custom { id: emoji_id, .. } = &reaction.emoji else {
        return;
    };
    if !data.config.settings.side_eye.emote_ids.contains(&emoji_id.get()) {
        return;
    }

    let Some(guild_id) = reaction.guild_id else {
        return;
    };

    // The row carries the reacted message's time, taken from its snowflake
    let record = SideEyeRecord {
        guild_id: guild_id.get(),
        channel_id: reaction.channel_id.get(),
        message_id: reaction.message_id.get(),
        emoji_id: emoji_id.get(),
        is_emoji: true,
        is_message: false,
        message_time: utc_from_unix(reaction.message_id.created_at().unix_timestamp()),
    };

    if side_eye::record_side_eye(&data.database, &record).await {
        info!("Logged side eye reaction with id {}", record.emoji_id);
    } else {
        warn!("Failed to log side eye reaction on {}", reaction.message_id);
    }
}
